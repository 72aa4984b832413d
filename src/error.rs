use thiserror::Error;

use crate::condition::WorkType;
use crate::road::Category;

/// Failures surfaced by the engine. A zero or negative measurement is not an
/// error: it becomes a 0 coefficient and is classified as failing.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    #[error("invalid financial input `{field}`: {reason}")]
    InvalidFinancialInput { field: &'static str, reason: String },

    #[error("EIRR search did not converge after {iterations} iterations (last estimate {last_estimate:.6})")]
    NonConvergentIrr { iterations: u32, last_estimate: f64 },

    #[error("EIRR undefined: net cash flow never changes sign within the search bracket")]
    IrrNoSignChange,

    #[error("EIRR undefined: NPV overflows across the search bracket (narrowed to [{lower}, {upper}])")]
    IrrBracketOverflow { lower: f64, upper: f64 },

    #[error("cost table has no unit cost for {work_type} on category {category}")]
    InconsistentCostTable {
        work_type: WorkType,
        category: Category,
    },

    #[error("no methodology value configured for category {0}")]
    UnknownCategory(String),

    #[error("no cost factor configured for region `{0}`")]
    UnknownRegion(String),

    #[error("invalid road section `{id}`: {reason}")]
    InvalidSection { id: String, reason: String },
}

impl EngineError {
    pub fn financial(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidFinancialInput {
            field,
            reason: reason.into(),
        }
    }
}
