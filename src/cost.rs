use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::condition::WorkType;
use crate::error::EngineError;
use crate::road::{Category, RoadSection};
use crate::tables::CategoryTable;

/// Unit costs per km, thousands of currency units, by work type and category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostTable {
    #[serde(default = "default_current_repair")]
    pub current_repair: CategoryTable,
    #[serde(default = "default_capital_repair")]
    pub capital_repair: CategoryTable,
    #[serde(default = "default_reconstruction")]
    pub reconstruction: CategoryTable,
    /// Multipliers keyed by region. Empty means every region costs the base rate.
    #[serde(default)]
    pub region_factors: BTreeMap<String, f64>,
}

impl CostTable {
    pub fn unit_cost(&self, work_type: WorkType, category: Category) -> Result<f64, EngineError> {
        let table = match work_type {
            WorkType::NoWorkNeeded => return Ok(0.0),
            WorkType::CurrentRepair => &self.current_repair,
            WorkType::CapitalRepair => &self.capital_repair,
            WorkType::Reconstruction => &self.reconstruction,
        };
        table
            .try_get(category)
            .ok_or(EngineError::InconsistentCostTable {
                work_type,
                category,
            })
    }

    pub fn region_factor(&self, region: &str) -> Result<f64, EngineError> {
        if self.region_factors.is_empty() {
            return Ok(1.0);
        }
        let key = region.trim().to_ascii_lowercase();
        self.region_factors
            .iter()
            .find(|(name, _)| name.to_ascii_lowercase() == key)
            .map(|(_, factor)| *factor)
            .ok_or_else(|| EngineError::UnknownRegion(region.to_string()))
    }
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            current_repair: default_current_repair(),
            capital_repair: default_capital_repair(),
            reconstruction: default_reconstruction(),
            region_factors: BTreeMap::new(),
        }
    }
}

fn default_current_repair() -> CategoryTable {
    CategoryTable::new([
        (Category::I, 2_900.0),
        (Category::II, 2_300.0),
        (Category::III, 1_700.0),
        (Category::IV, 1_200.0),
        (Category::V, 800.0),
    ])
}

fn default_capital_repair() -> CategoryTable {
    CategoryTable::new([
        (Category::I, 24_000.0),
        (Category::II, 18_500.0),
        (Category::III, 13_000.0),
        (Category::IV, 9_000.0),
        (Category::V, 6_000.0),
    ])
}

fn default_reconstruction() -> CategoryTable {
    CategoryTable::new([
        (Category::I, 95_000.0),
        (Category::II, 70_000.0),
        (Category::III, 48_000.0),
        (Category::IV, 32_000.0),
        (Category::V, 21_000.0),
    ])
}

/// Unit cost times length. `NoWorkNeeded` always costs 0.
pub fn estimate_cost(
    work_type: WorkType,
    category: Category,
    length_km: f64,
    table: &CostTable,
) -> Result<f64, EngineError> {
    Ok(table.unit_cost(work_type, category)? * length_km)
}

/// [`estimate_cost`] for a section, adjusted by its regional factor.
pub fn estimate_section_cost(
    section: &RoadSection,
    work_type: WorkType,
    table: &CostTable,
) -> Result<f64, EngineError> {
    let base = estimate_cost(work_type, section.category, section.length_km, table)?;
    if work_type == WorkType::NoWorkNeeded {
        return Ok(0.0);
    }
    Ok(base * table.region_factor(&section.region)?)
}
