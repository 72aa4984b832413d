use tracing::debug;

use crate::condition::{ClassifierThresholds, CoefficientKind, DetailedTechnicalCondition, WorkType};

/// Maps a condition to the most severe applicable work type.
///
/// Every coefficient is compared against its own pass threshold. A severe
/// shortfall on any coefficient means reconstruction; a strength failure
/// means capital repair; any other failure means current repair.
pub fn classify_work(
    condition: &DetailedTechnicalCondition,
    thresholds: &ClassifierThresholds,
) -> WorkType {
    let mut any_failing = false;
    let mut any_severe = false;
    let mut strength_failing = false;

    for reading in condition.readings() {
        let pass = thresholds.pass_threshold_for(reading.kind);
        if reading.coefficient >= pass {
            continue;
        }
        any_failing = true;
        if reading.coefficient < pass * thresholds.severe_ratio {
            any_severe = true;
        }
        if reading.kind == CoefficientKind::Strength {
            strength_failing = true;
        }
    }

    let work_type = if !any_failing {
        WorkType::NoWorkNeeded
    } else if any_severe {
        WorkType::Reconstruction
    } else if strength_failing {
        WorkType::CapitalRepair
    } else {
        WorkType::CurrentRepair
    };
    debug!(category = %condition.category, %work_type, "classified required work");
    work_type
}
