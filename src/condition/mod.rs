pub mod calculator;
pub mod classifier;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::road::Category;
use crate::tables::CategoryTable;

pub use calculator::compute_condition;
pub use classifier::classify_work;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CoefficientKind {
    Intensity,
    Strength,
    Evenness,
    Rut,
    Friction,
}

impl CoefficientKind {
    pub const ALL: [CoefficientKind; 5] = [
        CoefficientKind::Intensity,
        CoefficientKind::Strength,
        CoefficientKind::Evenness,
        CoefficientKind::Rut,
        CoefficientKind::Friction,
    ];
}

impl Display for CoefficientKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intensity => write!(f, "intensity"),
            Self::Strength => write!(f, "strength"),
            Self::Evenness => write!(f, "evenness"),
            Self::Rut => write!(f, "rut"),
            Self::Friction => write!(f, "friction"),
        }
    }
}

/// One measured property with its category threshold and derived coefficient.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CoefficientReading {
    pub kind: CoefficientKind,
    pub actual: f64,
    pub threshold: f64,
    pub coefficient: f64,
}

/// Coefficients of a single section. Built once by [`compute_condition`];
/// a change in inputs means computing a new one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailedTechnicalCondition {
    pub category: Category,
    pub intensity: CoefficientReading,
    pub strength: CoefficientReading,
    pub evenness: CoefficientReading,
    pub rut: CoefficientReading,
    pub friction: CoefficientReading,
}

impl DetailedTechnicalCondition {
    pub fn readings(&self) -> [&CoefficientReading; 5] {
        [
            &self.intensity,
            &self.strength,
            &self.evenness,
            &self.rut,
            &self.friction,
        ]
    }

    pub fn coefficient(&self, kind: CoefficientKind) -> f64 {
        match kind {
            CoefficientKind::Intensity => self.intensity.coefficient,
            CoefficientKind::Strength => self.strength.coefficient,
            CoefficientKind::Evenness => self.evenness.coefficient,
            CoefficientKind::Rut => self.rut.coefficient,
            CoefficientKind::Friction => self.friction.coefficient,
        }
    }

    /// Coefficients below their pass threshold.
    pub fn failing(&self, thresholds: &ClassifierThresholds) -> Vec<CoefficientKind> {
        self.readings()
            .iter()
            .filter(|r| r.coefficient < thresholds.pass_threshold_for(r.kind))
            .map(|r| r.kind)
            .collect()
    }
}

/// Required action, ordered by severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    NoWorkNeeded,
    CurrentRepair,
    CapitalRepair,
    Reconstruction,
}

impl WorkType {
    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::NoWorkNeeded => "no_work_needed",
            Self::CurrentRepair => "current_repair",
            Self::CapitalRepair => "capital_repair",
            Self::Reconstruction => "reconstruction",
        }
    }
}

impl Display for WorkType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::NoWorkNeeded => "no work needed",
            Self::CurrentRepair => "current repair",
            Self::CapitalRepair => "capital repair",
            Self::Reconstruction => "reconstruction",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown work type: {0}")]
pub struct WorkTypeParseError(pub String);

impl FromStr for WorkType {
    type Err = WorkTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "no_work_needed" | "none" => Ok(Self::NoWorkNeeded),
            "current_repair" => Ok(Self::CurrentRepair),
            "capital_repair" => Ok(Self::CapitalRepair),
            "reconstruction" => Ok(Self::Reconstruction),
            _ => Err(WorkTypeParseError(s.to_string())),
        }
    }
}

/// Category thresholds used by the coefficient calculator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodologyTables {
    #[serde(default = "default_required_modulus")]
    pub required_modulus_mpa: f64,
    #[serde(default = "default_required_friction")]
    pub required_friction: f64,
    #[serde(default = "default_rigid_strength_factor")]
    pub rigid_strength_factor: f64,
    #[serde(default = "default_design_intensity")]
    pub design_intensity: CategoryTable,
    #[serde(default = "default_allowed_evenness")]
    pub allowed_evenness: CategoryTable,
    #[serde(default = "default_allowed_rut_depth")]
    pub allowed_rut_depth: CategoryTable,
    #[serde(default = "default_min_strength")]
    pub min_strength: CategoryTable,
}

impl Default for MethodologyTables {
    fn default() -> Self {
        Self {
            required_modulus_mpa: default_required_modulus(),
            required_friction: default_required_friction(),
            rigid_strength_factor: default_rigid_strength_factor(),
            design_intensity: default_design_intensity(),
            allowed_evenness: default_allowed_evenness(),
            allowed_rut_depth: default_allowed_rut_depth(),
            min_strength: default_min_strength(),
        }
    }
}

fn default_required_modulus() -> f64 {
    200.0
}

fn default_required_friction() -> f64 {
    0.35
}

fn default_rigid_strength_factor() -> f64 {
    1.2
}

fn default_design_intensity() -> CategoryTable {
    CategoryTable::new([
        (Category::I, 20_000.0),
        (Category::II, 12_000.0),
        (Category::III, 6_000.0),
        (Category::IV, 2_000.0),
        (Category::V, 500.0),
    ])
}

fn default_allowed_evenness() -> CategoryTable {
    CategoryTable::split(3.1, 4.0)
}

fn default_allowed_rut_depth() -> CategoryTable {
    CategoryTable::split(20.0, 30.0)
}

fn default_min_strength() -> CategoryTable {
    CategoryTable::new([
        (Category::I, 1.0),
        (Category::II, 0.98),
        (Category::III, 0.95),
        (Category::IV, 0.9),
        (Category::V, 0.85),
    ])
}

/// Pass thresholds of the work classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClassifierThresholds {
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,
    #[serde(default = "default_strength_pass_threshold")]
    pub strength_pass_threshold: f64,
    /// A coefficient below `severe_ratio` times its pass threshold is a severe shortfall.
    #[serde(default = "default_severe_ratio")]
    pub severe_ratio: f64,
}

impl ClassifierThresholds {
    pub fn pass_threshold_for(&self, kind: CoefficientKind) -> f64 {
        match kind {
            CoefficientKind::Strength => self.strength_pass_threshold,
            _ => self.pass_threshold,
        }
    }
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            pass_threshold: default_pass_threshold(),
            strength_pass_threshold: default_strength_pass_threshold(),
            severe_ratio: default_severe_ratio(),
        }
    }
}

fn default_pass_threshold() -> f64 {
    1.0
}

fn default_strength_pass_threshold() -> f64 {
    0.85
}

fn default_severe_ratio() -> f64 {
    0.80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_types_order_by_severity() {
        assert!(WorkType::NoWorkNeeded < WorkType::CurrentRepair);
        assert!(WorkType::CurrentRepair < WorkType::CapitalRepair);
        assert!(WorkType::CapitalRepair < WorkType::Reconstruction);
    }

    #[test]
    fn parses_work_type_aliases() {
        assert_eq!(
            "Capital Repair".parse::<WorkType>().expect("work type"),
            WorkType::CapitalRepair
        );
        assert_eq!(
            "no-work-needed".parse::<WorkType>().expect("work type"),
            WorkType::NoWorkNeeded
        );
        assert!("resurfacing".parse::<WorkType>().is_err());
    }

    #[test]
    fn strength_uses_its_own_pass_threshold() {
        let thresholds = ClassifierThresholds::default();
        assert_eq!(thresholds.pass_threshold_for(CoefficientKind::Strength), 0.85);
        assert_eq!(thresholds.pass_threshold_for(CoefficientKind::Rut), 1.0);
    }
}
