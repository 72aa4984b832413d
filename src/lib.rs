//! Road condition assessment and economic appraisal.
//!
//! Survey measurements become condition coefficients, coefficients become a
//! required work type and cost estimate, and financial assumptions become a
//! discounted cash-flow appraisal that ranks candidate projects.

pub mod appraisal;
pub mod condition;
pub mod config;
pub mod cost;
pub mod error;
pub mod output;
pub mod portfolio;
pub mod ranking;
pub mod road;
pub mod tables;

pub use appraisal::{appraise_project, Appraisal, AppraisalInput, AppraisalResult, YearRecord};
pub use condition::{classify_work, compute_condition, DetailedTechnicalCondition, WorkType};
pub use cost::{estimate_cost, CostTable};
pub use error::EngineError;
pub use ranking::{rank_projects, ProjectAppraisal, RankedProject};
pub use road::{Category, Measurements, RoadSection};
