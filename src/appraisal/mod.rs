pub mod engine;
pub mod irr;
pub mod payback;
pub mod schedule;
pub mod sensitivity;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub use engine::appraise_project;

/// Annual economic benefits of a project, in the same units as the investment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct BenefitComponents {
    #[serde(default)]
    pub vehicle_fleet: f64,
    #[serde(default)]
    pub transport_cost: f64,
    #[serde(default)]
    pub accident_reduction: f64,
    #[serde(default)]
    pub environmental: f64,
}

impl BenefitComponents {
    pub fn total(&self) -> f64 {
        self.vehicle_fleet + self.transport_cost + self.accident_reduction + self.environmental
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            vehicle_fleet: self.vehicle_fleet * factor,
            transport_cost: self.transport_cost * factor,
            accident_reduction: self.accident_reduction * factor,
            environmental: self.environmental * factor,
        }
    }

    fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("benefits.vehicle_fleet", self.vehicle_fleet),
            ("benefits.transport_cost", self.transport_cost),
            ("benefits.accident_reduction", self.accident_reduction),
            ("benefits.environmental", self.environmental),
        ]
    }
}

/// Longest appraisal horizon accepted by [`AppraisalInput::validate`].
pub const MAX_HORIZON_YEARS: u32 = 1000;

fn default_start_year() -> i32 {
    chrono::Local::now().year()
}

/// Project-level financial assumptions for one section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppraisalInput {
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    pub investment_cost: f64,
    #[serde(default)]
    pub service_life_years: u32,
    pub discount_rate: f64,
    #[serde(default)]
    pub benefits: BenefitComponents,
    #[serde(default)]
    pub maintenance_cost_before: f64,
    #[serde(default)]
    pub maintenance_cost_after: f64,
    #[serde(default)]
    pub traffic_growth_rate: f64,
    pub horizon_years: u32,
}

impl AppraisalInput {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.investment_cost.is_finite() || self.investment_cost <= 0.0 {
            return Err(EngineError::financial(
                "investment_cost",
                format!("must be positive, got {}", self.investment_cost),
            ));
        }
        if self.horizon_years == 0 {
            return Err(EngineError::financial(
                "horizon_years",
                "must be at least one year",
            ));
        }
        if self.horizon_years > MAX_HORIZON_YEARS {
            return Err(EngineError::financial(
                "horizon_years",
                format!(
                    "must not exceed {MAX_HORIZON_YEARS} years, got {}",
                    self.horizon_years
                ),
            ));
        }
        let last_year = i32::try_from(self.horizon_years)
            .ok()
            .and_then(|horizon| self.start_year.checked_add(horizon));
        if last_year.is_none() {
            return Err(EngineError::financial(
                "start_year",
                format!(
                    "{} plus a {}-year horizon is out of range",
                    self.start_year, self.horizon_years
                ),
            ));
        }
        if !self.discount_rate.is_finite() || self.discount_rate <= -1.0 {
            return Err(EngineError::financial(
                "discount_rate",
                format!("must be greater than -1, got {}", self.discount_rate),
            ));
        }
        if !self.traffic_growth_rate.is_finite() || self.traffic_growth_rate < -1.0 {
            return Err(EngineError::financial(
                "traffic_growth_rate",
                format!("must be at least -1, got {}", self.traffic_growth_rate),
            ));
        }
        let amounts = self.benefits.fields().into_iter().chain([
            ("maintenance_cost_before", self.maintenance_cost_before),
            ("maintenance_cost_after", self.maintenance_cost_after),
        ]);
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::financial(
                    field,
                    format!("must be non-negative, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// One row of the cash-flow schedule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct YearRecord {
    pub year: u32,
    pub calendar_year: i32,
    pub traffic: f64,
    pub capital_outlay: f64,
    pub maintenance_outlay: f64,
    pub benefit: f64,
    pub net_effect: f64,
    pub discount_factor: f64,
    pub discounted_value: f64,
    pub cumulative_enpv: f64,
}

/// Discounted totals per benefit component.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct BenefitBreakdown {
    pub vehicle_fleet: f64,
    pub transport_cost: f64,
    pub accident_reduction: f64,
    pub environmental: f64,
}

impl BenefitBreakdown {
    pub fn total(&self) -> f64 {
        self.vehicle_fleet + self.transport_cost + self.accident_reduction + self.environmental
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EirrStatus {
    Converged { iterations: u32 },
    NoSignChange,
    BracketOverflow,
    NonConvergent { iterations: u32, last_estimate: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppraisalResult {
    pub enpv: f64,
    /// Present only when the root search converged.
    pub eirr: Option<f64>,
    pub eirr_status: EirrStatus,
    pub bcr: f64,
    /// Fractional years; `None` when the project never pays back within the horizon.
    pub payback_years: Option<f64>,
    pub total_discounted_benefits: f64,
    pub total_discounted_costs: f64,
    pub benefit_breakdown: BenefitBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appraisal {
    pub year_records: Vec<YearRecord>,
    pub result: AppraisalResult,
}

/// Bounds of the EIRR root search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IrrSettings {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_lower_bound")]
    pub lower_bound: f64,
    #[serde(default = "default_upper_bound")]
    pub upper_bound: f64,
}

impl IrrSettings {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_iterations == 0 {
            return Err(EngineError::financial(
                "appraisal.max_iterations",
                "must be at least 1",
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(EngineError::financial(
                "appraisal.tolerance",
                format!("must be positive, got {}", self.tolerance),
            ));
        }
        if !(self.lower_bound > -1.0 && self.lower_bound < self.upper_bound)
            || !self.upper_bound.is_finite()
        {
            return Err(EngineError::financial(
                "appraisal.lower_bound",
                format!(
                    "search bracket [{}, {}] must satisfy -1 < lower < upper",
                    self.lower_bound, self.upper_bound
                ),
            ));
        }
        Ok(())
    }
}

impl Default for IrrSettings {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            lower_bound: default_lower_bound(),
            upper_bound: default_upper_bound(),
        }
    }
}

fn default_max_iterations() -> u32 {
    100
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_lower_bound() -> f64 {
    -0.99
}

fn default_upper_bound() -> f64 {
    10.0
}

/// A stress applied to the appraisal input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "delta", rename_all = "snake_case")]
pub enum SensitivityScenario {
    /// Absolute shift of the discount rate, e.g. 0.02 for +2 points.
    DiscountRateShift(f64),
    /// Relative change of the investment cost, e.g. 0.2 for +20 %.
    InvestmentChange(f64),
    BenefitChange(f64),
    MaintenanceChange(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutcome {
    pub scenario: SensitivityScenario,
    pub label: String,
    pub enpv: f64,
    pub bcr: f64,
    pub eirr: Option<f64>,
    pub enpv_delta: f64,
    pub still_viable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub project_id: String,
    pub baseline: AppraisalResult,
    pub outcomes: Vec<SensitivityOutcome>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::road::{Category, RoadSection, Significance};

    pub fn section() -> RoadSection {
        RoadSection {
            id: "M-05".to_string(),
            name: "Kyiv - Odesa".to_string(),
            category: Category::I,
            length_km: 20.0,
            significance: Significance::State,
            region: "kyiv".to_string(),
            traffic_intensity: 10_000.0,
            defense_road: false,
            international_road: true,
            european_network: true,
        }
    }

    /// 100 invested, flat net benefit of 15 per year, 5 %, 15 years.
    pub fn flat_input() -> AppraisalInput {
        AppraisalInput {
            start_year: 2025,
            investment_cost: 100.0,
            service_life_years: 15,
            discount_rate: 0.05,
            benefits: BenefitComponents {
                vehicle_fleet: 6.0,
                transport_cost: 7.0,
                accident_reduction: 2.5,
                environmental: 1.0,
            },
            maintenance_cost_before: 3.0,
            maintenance_cost_after: 1.5,
            traffic_growth_rate: 0.02,
            horizon_years: 15,
        }
    }
}
