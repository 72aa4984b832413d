use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::EngineError;

/// Road category, I (highest capacity) through V.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    I,
    II,
    III,
    IV,
    V,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::I,
        Category::II,
        Category::III,
        Category::IV,
        Category::V,
    ];

    pub fn ordinal(self) -> u8 {
        match self {
            Self::I => 1,
            Self::II => 2,
            Self::III => 3,
            Self::IV => 4,
            Self::V => 5,
        }
    }

    pub fn as_roman(self) -> &'static str {
        match self {
            Self::I => "I",
            Self::II => "II",
            Self::III => "III",
            Self::IV => "IV",
            Self::V => "V",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_roman())
    }
}

#[derive(Debug, Error)]
#[error("unknown road category: {0}")]
pub struct CategoryParseError(pub String);

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "I" | "1" => Ok(Self::I),
            "II" | "2" => Ok(Self::II),
            "III" | "3" => Ok(Self::III),
            "IV" | "4" => Ok(Self::IV),
            "V" | "5" => Ok(Self::V),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = CategoryParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_roman().to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    State,
    Local,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PavementType {
    #[default]
    Flexible,
    Rigid,
}

/// Identity and physical facts about a surveyed road segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoadSection {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub length_km: f64,
    pub significance: Significance,
    pub region: String,
    /// Measured traffic, vehicles per day.
    pub traffic_intensity: f64,
    #[serde(default)]
    pub defense_road: bool,
    #[serde(default)]
    pub international_road: bool,
    #[serde(default)]
    pub european_network: bool,
}

impl RoadSection {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.length_km.is_finite() || self.length_km <= 0.0 {
            return Err(EngineError::InvalidSection {
                id: self.id.clone(),
                reason: format!("length must be positive, got {}", self.length_km),
            });
        }
        if !self.traffic_intensity.is_finite() || self.traffic_intensity < 0.0 {
            return Err(EngineError::InvalidSection {
                id: self.id.clone(),
                reason: format!(
                    "traffic intensity must be non-negative, got {}",
                    self.traffic_intensity
                ),
            });
        }
        Ok(())
    }

    /// Weighting hints carried for presentation only.
    pub fn strategic_flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.defense_road {
            flags.push("defense");
        }
        if self.international_road {
            flags.push("international");
        }
        if self.european_network {
            flags.push("e-road");
        }
        flags
    }
}

/// Raw survey values for the four physical measurements taken on a segment.
/// Traffic intensity comes from the section itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Measurements {
    /// Load-bearing modulus, MPa.
    pub modulus_mpa: f64,
    /// Surface evenness, m/km.
    pub evenness_m_per_km: f64,
    pub rut_depth_mm: f64,
    /// Friction value in [0, 1].
    pub friction: f64,
    #[serde(default)]
    pub pavement: PavementType,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> RoadSection {
        RoadSection {
            id: "M-06".to_string(),
            name: "Kyiv - Chop".to_string(),
            category: Category::II,
            length_km: 12.5,
            significance: Significance::State,
            region: "lviv".to_string(),
            traffic_intensity: 8_000.0,
            defense_road: true,
            international_road: false,
            european_network: true,
        }
    }

    #[test]
    fn parses_roman_and_arabic_categories() {
        assert_eq!("ii".parse::<Category>().expect("roman"), Category::II);
        assert_eq!(" 4 ".parse::<Category>().expect("arabic"), Category::IV);
        assert!("VI".parse::<Category>().is_err());
        assert_eq!(Category::III.ordinal(), 3);
    }

    #[test]
    fn rejects_non_positive_length() {
        let mut s = section();
        assert!(s.validate().is_ok());
        s.length_km = 0.0;
        assert!(matches!(
            s.validate(),
            Err(EngineError::InvalidSection { .. })
        ));
    }

    #[test]
    fn lists_strategic_flags() {
        assert_eq!(section().strategic_flags(), vec!["defense", "e-road"]);
    }
}
