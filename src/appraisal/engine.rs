use tracing::{debug, warn};

use crate::appraisal::irr::solve_irr;
use crate::appraisal::payback::payback_period;
use crate::appraisal::schedule::build_schedule;
use crate::appraisal::{
    Appraisal, AppraisalInput, AppraisalResult, BenefitBreakdown, EirrStatus, IrrSettings,
    YearRecord,
};
use crate::error::EngineError;
use crate::road::RoadSection;

/// Discounted cash-flow appraisal of one section.
///
/// Invalid financial input fails the whole call. An undefined EIRR does not:
/// the result keeps ENPV, BCR and payback and records why EIRR is missing.
pub fn appraise_project(
    section: &RoadSection,
    input: &AppraisalInput,
    settings: &IrrSettings,
) -> Result<Appraisal, EngineError> {
    input.validate()?;
    settings.validate()?;
    if input.service_life_years > 0 && input.horizon_years > input.service_life_years {
        warn!(
            section = %section.id,
            horizon = input.horizon_years,
            service_life = input.service_life_years,
            "evaluation horizon exceeds planned service life"
        );
    }

    let year_records = build_schedule(section.traffic_intensity, input);
    let result = summarize(section, input, &year_records, settings);
    Ok(Appraisal {
        year_records,
        result,
    })
}

fn summarize(
    section: &RoadSection,
    input: &AppraisalInput,
    records: &[YearRecord],
    settings: &IrrSettings,
) -> AppraisalResult {
    let mut total_discounted_benefits = 0.0;
    let mut total_discounted_costs = 0.0;
    let mut benefit_factor_sum = 0.0;
    for record in records {
        total_discounted_benefits += record.benefit * record.discount_factor;
        total_discounted_costs +=
            (record.capital_outlay + record.maintenance_outlay) * record.discount_factor;
        if record.year > 0 {
            benefit_factor_sum += record.discount_factor;
        }
    }

    let enpv = records.last().map(|r| r.cumulative_enpv).unwrap_or(0.0);
    let bcr = total_discounted_benefits / total_discounted_costs;

    let flows: Vec<f64> = records.iter().map(|r| r.net_effect).collect();
    let (eirr, eirr_status) = match solve_irr(&flows, settings) {
        Ok(solution) => (
            Some(solution.rate),
            EirrStatus::Converged {
                iterations: solution.iterations,
            },
        ),
        Err(EngineError::NonConvergentIrr {
            iterations,
            last_estimate,
        }) => {
            warn!(section = %section.id, iterations, "EIRR search exhausted its budget");
            (
                None,
                EirrStatus::NonConvergent {
                    iterations,
                    last_estimate,
                },
            )
        }
        Err(err @ EngineError::IrrBracketOverflow { .. }) => {
            warn!(section = %section.id, error = %err, "EIRR undefined");
            (None, EirrStatus::BracketOverflow)
        }
        Err(err) => {
            warn!(section = %section.id, error = %err, "EIRR undefined");
            (None, EirrStatus::NoSignChange)
        }
    };

    let benefits = &input.benefits;
    let benefit_breakdown = BenefitBreakdown {
        vehicle_fleet: benefits.vehicle_fleet * benefit_factor_sum,
        transport_cost: benefits.transport_cost * benefit_factor_sum,
        accident_reduction: benefits.accident_reduction * benefit_factor_sum,
        environmental: benefits.environmental * benefit_factor_sum,
    };

    let payback_years = payback_period(records);
    debug!(section = %section.id, enpv, bcr, ?eirr, ?payback_years, "appraisal complete");

    AppraisalResult {
        enpv,
        eirr,
        eirr_status,
        bcr,
        payback_years,
        total_discounted_benefits,
        total_discounted_costs,
        benefit_breakdown,
    }
}
