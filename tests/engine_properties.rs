use proptest::prelude::*;

use road_appraisal::appraisal::{AppraisalInput, BenefitComponents, IrrSettings};
use road_appraisal::condition::{
    ClassifierThresholds, CoefficientKind, CoefficientReading, DetailedTechnicalCondition,
    MethodologyTables,
};
use road_appraisal::road::{PavementType, Significance};
use road_appraisal::{
    appraise_project, classify_work, compute_condition, Category, EngineError, Measurements,
    RoadSection, WorkType,
};

fn arb_category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::I),
        Just(Category::II),
        Just(Category::III),
        Just(Category::IV),
        Just(Category::V),
    ]
}

fn arb_section() -> impl Strategy<Value = RoadSection> {
    (arb_category(), 0.0f64..40_000.0, 0.1f64..100.0).prop_map(|(category, traffic, length)| {
        RoadSection {
            id: "prop".to_string(),
            name: "generated".to_string(),
            category,
            length_km: length,
            significance: Significance::State,
            region: "any".to_string(),
            traffic_intensity: traffic,
            defense_road: false,
            international_road: false,
            european_network: false,
        }
    })
}

fn arb_measurements() -> impl Strategy<Value = Measurements> {
    (
        0.0f64..400.0,
        0.0f64..10.0,
        0.0f64..60.0,
        0.0f64..1.0,
        prop_oneof![Just(PavementType::Flexible), Just(PavementType::Rigid)],
    )
        .prop_map(|(modulus, evenness, rut, friction, pavement)| Measurements {
            modulus_mpa: modulus,
            evenness_m_per_km: evenness,
            rut_depth_mm: rut,
            friction,
            pavement,
        })
}

fn arb_coefficients() -> impl Strategy<Value = [f64; 5]> {
    [
        0.0f64..2.0,
        0.0f64..2.0,
        0.0f64..2.0,
        0.0f64..2.0,
        0.0f64..2.0,
    ]
}

fn arb_input() -> impl Strategy<Value = AppraisalInput> {
    (
        1.0f64..1_000.0,
        -0.5f64..0.5,
        0.0f64..80.0,
        0.0f64..40.0,
        0.0f64..20.0,
        1u32..40,
    )
        .prop_map(
            |(investment, rate, fleet, transport, maintenance, horizon)| AppraisalInput {
                start_year: 2025,
                investment_cost: investment,
                service_life_years: horizon,
                discount_rate: rate,
                benefits: BenefitComponents {
                    vehicle_fleet: fleet,
                    transport_cost: transport,
                    accident_reduction: 0.0,
                    environmental: 0.0,
                },
                maintenance_cost_before: 0.0,
                maintenance_cost_after: maintenance,
                traffic_growth_rate: 0.02,
                horizon_years: horizon,
            },
        )
}

fn condition_from(coefficients: [f64; 5]) -> DetailedTechnicalCondition {
    let reading = |kind, coefficient| CoefficientReading {
        kind,
        actual: 1.0,
        threshold: 1.0,
        coefficient,
    };
    DetailedTechnicalCondition {
        category: Category::II,
        intensity: reading(CoefficientKind::Intensity, coefficients[0]),
        strength: reading(CoefficientKind::Strength, coefficients[1]),
        evenness: reading(CoefficientKind::Evenness, coefficients[2]),
        rut: reading(CoefficientKind::Rut, coefficients[3]),
        friction: reading(CoefficientKind::Friction, coefficients[4]),
    }
}

fn section() -> RoadSection {
    RoadSection {
        id: "E-40".to_string(),
        name: "Kyiv - Zhytomyr".to_string(),
        category: Category::I,
        length_km: 30.0,
        significance: Significance::State,
        region: "kyiv".to_string(),
        traffic_intensity: 15_000.0,
        defense_road: false,
        international_road: true,
        european_network: true,
    }
}

proptest! {
    #[test]
    fn classification_is_deterministic(section in arb_section(), m in arb_measurements()) {
        let tables = MethodologyTables::default();
        let thresholds = ClassifierThresholds::default();
        let first = compute_condition(&section, &m, &tables).expect("condition");
        let second = compute_condition(&section, &m, &tables).expect("condition");
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(classify_work(&first, &thresholds), classify_work(&second, &thresholds));
        prop_assert!(first.readings().iter().all(|r| r.coefficient >= 0.0));
    }

    #[test]
    fn lowering_a_coefficient_never_lowers_severity(
        coefficients in arb_coefficients(),
        idx in 0usize..5,
        factor in 0.0f64..1.0,
    ) {
        let thresholds = ClassifierThresholds::default();
        let before = classify_work(&condition_from(coefficients), &thresholds);
        let mut lowered = coefficients;
        lowered[idx] *= factor;
        let after = classify_work(&condition_from(lowered), &thresholds);
        prop_assert!(after >= before, "{:?} -> {:?}", before, after);
    }

    #[test]
    fn enpv_is_discounted_benefits_minus_costs(input in arb_input()) {
        let appraisal = appraise_project(&section(), &input, &IrrSettings::default())
            .expect("valid input");
        let r = &appraisal.result;
        let tolerance = 1e-9 * (1.0 + r.total_discounted_benefits.abs() + r.total_discounted_costs.abs());
        prop_assert!((r.enpv - (r.total_discounted_benefits - r.total_discounted_costs)).abs() <= tolerance);
        prop_assert!(r.enpv.is_finite() && r.bcr.is_finite());
        prop_assert_eq!(appraisal.year_records.len(), input.horizon_years as usize + 1);
        prop_assert_eq!(appraisal.year_records[0].capital_outlay, input.investment_cost);
        prop_assert_eq!(appraisal.year_records[0].benefit, 0.0);
        if let Some(eirr) = r.eirr {
            prop_assert!(eirr.is_finite());
        }
    }

    #[test]
    fn higher_discount_rate_never_shortens_payback(input in arb_input(), bump in 0.0f64..0.3) {
        let mut stressed = input.clone();
        stressed.discount_rate += bump;
        let settings = IrrSettings::default();
        let base = appraise_project(&section(), &input, &settings).expect("base");
        let higher = appraise_project(&section(), &stressed, &settings).expect("stressed");
        let as_years = |p: Option<f64>| p.unwrap_or(f64::INFINITY);
        prop_assert!(
            as_years(higher.result.payback_years) >= as_years(base.result.payback_years) - 1e-9
        );
    }
}

#[test]
fn zero_investment_is_a_typed_error_not_nan() {
    let input = AppraisalInput {
        start_year: 2025,
        investment_cost: 0.0,
        service_life_years: 10,
        discount_rate: 0.05,
        benefits: BenefitComponents {
            vehicle_fleet: 5.0,
            ..BenefitComponents::default()
        },
        maintenance_cost_before: 0.0,
        maintenance_cost_after: 0.0,
        traffic_growth_rate: 0.0,
        horizon_years: 10,
    };
    let err = appraise_project(&section(), &input, &IrrSettings::default())
        .expect_err("zero investment");
    assert!(matches!(
        err,
        EngineError::InvalidFinancialInput {
            field: "investment_cost",
            ..
        }
    ));
}

#[test]
fn survey_scenario_category_two_requires_reconstruction() {
    let mut road = section();
    road.category = Category::II;
    road.traffic_intensity = 20_000.0;
    let m = Measurements {
        modulus_mpa: 180.0,
        evenness_m_per_km: 3.5,
        rut_depth_mm: 25.0,
        friction: 0.30,
        pavement: PavementType::Flexible,
    };
    let thresholds = ClassifierThresholds::default();
    let condition =
        compute_condition(&road, &m, &MethodologyTables::default()).expect("condition");
    assert!((condition.intensity.coefficient - 0.6).abs() < 1e-9);
    assert_eq!(
        condition.failing(&thresholds),
        vec![
            CoefficientKind::Intensity,
            CoefficientKind::Evenness,
            CoefficientKind::Rut,
            CoefficientKind::Friction,
        ]
    );
    assert_eq!(classify_work(&condition, &thresholds), WorkType::Reconstruction);
}

#[test]
fn unmeasured_friction_forces_at_least_current_repair() {
    let m = Measurements {
        modulus_mpa: 260.0,
        evenness_m_per_km: 2.0,
        rut_depth_mm: 5.0,
        friction: 0.0,
        pavement: PavementType::Flexible,
    };
    let mut road = section();
    road.traffic_intensity = 5_000.0;
    let condition =
        compute_condition(&road, &m, &MethodologyTables::default()).expect("condition");
    assert_eq!(condition.friction.coefficient, 0.0);
    let work = classify_work(&condition, &ClassifierThresholds::default());
    assert!(work >= WorkType::CurrentRepair);
}

#[test]
fn flat_benefit_scenario() {
    let input = AppraisalInput {
        start_year: 2025,
        investment_cost: 100.0,
        service_life_years: 15,
        discount_rate: 0.05,
        benefits: BenefitComponents {
            transport_cost: 15.0,
            ..BenefitComponents::default()
        },
        maintenance_cost_before: 0.0,
        maintenance_cost_after: 0.0,
        traffic_growth_rate: 0.0,
        horizon_years: 15,
    };
    let appraisal =
        appraise_project(&section(), &input, &IrrSettings::default()).expect("appraisal");
    let r = &appraisal.result;
    assert!((r.enpv - 55.69).abs() < 0.01);
    assert!(r.bcr > 1.0);
    let payback = r.payback_years.expect("pays back");
    assert!(payback > 8.0 && payback < 9.0, "payback {payback}");
}
