use crate::appraisal::engine::appraise_project;
use crate::appraisal::{
    AppraisalInput, IrrSettings, SensitivityOutcome, SensitivityReport, SensitivityScenario,
};
use crate::error::EngineError;
use crate::road::RoadSection;

pub fn standard_scenarios() -> Vec<SensitivityScenario> {
    vec![
        SensitivityScenario::DiscountRateShift(0.02),
        SensitivityScenario::DiscountRateShift(-0.02),
        SensitivityScenario::InvestmentChange(0.20),
        SensitivityScenario::BenefitChange(-0.20),
        SensitivityScenario::MaintenanceChange(0.20),
    ]
}

impl SensitivityScenario {
    pub fn apply(&self, input: &AppraisalInput) -> AppraisalInput {
        let mut changed = input.clone();
        match *self {
            Self::DiscountRateShift(delta) => changed.discount_rate += delta,
            Self::InvestmentChange(ratio) => changed.investment_cost *= 1.0 + ratio,
            Self::BenefitChange(ratio) => changed.benefits = input.benefits.scaled(1.0 + ratio),
            Self::MaintenanceChange(ratio) => changed.maintenance_cost_after *= 1.0 + ratio,
        }
        changed
    }

    pub fn label(&self) -> String {
        match *self {
            Self::DiscountRateShift(delta) => {
                format!("discount rate {:+.1} pp", delta * 100.0)
            }
            Self::InvestmentChange(ratio) => format!("investment {:+.0}%", ratio * 100.0),
            Self::BenefitChange(ratio) => format!("benefits {:+.0}%", ratio * 100.0),
            Self::MaintenanceChange(ratio) => format!("maintenance {:+.0}%", ratio * 100.0),
        }
    }
}

/// Re-appraises a project under each scenario and compares against the baseline.
pub fn run_sensitivity(
    section: &RoadSection,
    input: &AppraisalInput,
    settings: &IrrSettings,
    scenarios: &[SensitivityScenario],
) -> Result<SensitivityReport, EngineError> {
    let baseline = appraise_project(section, input, settings)?.result;

    let mut outcomes = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let stressed = appraise_project(section, &scenario.apply(input), settings)?.result;
        outcomes.push(SensitivityOutcome {
            scenario: *scenario,
            label: scenario.label(),
            enpv: stressed.enpv,
            bcr: stressed.bcr,
            eirr: stressed.eirr,
            enpv_delta: stressed.enpv - baseline.enpv,
            still_viable: stressed.bcr > 1.0,
        });
    }

    Ok(SensitivityReport {
        project_id: section.id.clone(),
        baseline,
        outcomes,
    })
}
