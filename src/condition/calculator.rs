use tracing::debug;

use crate::condition::{
    CoefficientKind, CoefficientReading, DetailedTechnicalCondition, MethodologyTables,
};
use crate::error::EngineError;
use crate::road::{Measurements, PavementType, RoadSection};

/// Converts the survey of one section into its five condition coefficients.
///
/// Fails only when a category threshold is missing from the methodology
/// tables. Unmeasured values (zero, negative, non-finite) give a 0 coefficient.
pub fn compute_condition(
    section: &RoadSection,
    measurements: &Measurements,
    tables: &MethodologyTables,
) -> Result<DetailedTechnicalCondition, EngineError> {
    let category = section.category;

    let design_intensity = tables.design_intensity.get(category)?;
    let intensity = reading(
        CoefficientKind::Intensity,
        section.traffic_intensity,
        design_intensity,
        threshold_over_actual(design_intensity, section.traffic_intensity),
    );

    let flexible = actual_over_threshold(measurements.modulus_mpa, tables.required_modulus_mpa);
    let strength_coefficient = match measurements.pavement {
        PavementType::Flexible => flexible,
        PavementType::Rigid => {
            flexible * tables.rigid_strength_factor * tables.min_strength.get(category)?
        }
    };
    let strength = reading(
        CoefficientKind::Strength,
        measurements.modulus_mpa,
        tables.required_modulus_mpa,
        strength_coefficient,
    );

    let allowed_evenness = tables.allowed_evenness.get(category)?;
    let evenness = reading(
        CoefficientKind::Evenness,
        measurements.evenness_m_per_km,
        allowed_evenness,
        threshold_over_actual(allowed_evenness, measurements.evenness_m_per_km),
    );

    let allowed_rut = tables.allowed_rut_depth.get(category)?;
    let rut = reading(
        CoefficientKind::Rut,
        measurements.rut_depth_mm,
        allowed_rut,
        threshold_over_actual(allowed_rut, measurements.rut_depth_mm),
    );

    let friction = reading(
        CoefficientKind::Friction,
        measurements.friction,
        tables.required_friction,
        actual_over_threshold(measurements.friction, tables.required_friction),
    );

    debug!(
        section = %section.id,
        intensity = intensity.coefficient,
        strength = strength.coefficient,
        evenness = evenness.coefficient,
        rut = rut.coefficient,
        friction = friction.coefficient,
        "computed condition coefficients"
    );

    Ok(DetailedTechnicalCondition {
        category,
        intensity,
        strength,
        evenness,
        rut,
        friction,
    })
}

fn reading(kind: CoefficientKind, actual: f64, threshold: f64, coefficient: f64) -> CoefficientReading {
    CoefficientReading {
        kind,
        actual,
        threshold,
        coefficient,
    }
}

fn is_measured(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Smaller actual is better (evenness, rut depth, traffic load).
fn threshold_over_actual(threshold: f64, actual: f64) -> f64 {
    if !is_measured(actual) || !is_measured(threshold) {
        return 0.0;
    }
    threshold / actual
}

/// Larger actual is better (modulus, friction).
fn actual_over_threshold(actual: f64, threshold: f64) -> f64 {
    if !is_measured(actual) || !is_measured(threshold) {
        return 0.0;
    }
    actual / threshold
}
