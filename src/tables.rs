use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::road::{Category, CategoryParseError};

/// Operator-editable mapping from road category to a methodology value.
///
/// Keys are validated when the table is loaded; a category that is simply
/// absent is reported by [`CategoryTable::get`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct CategoryTable {
    values: BTreeMap<Category, f64>,
}

impl CategoryTable {
    pub fn new(values: impl IntoIterator<Item = (Category, f64)>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// `high` for categories I and II, `low` for the rest.
    pub fn split(high: f64, low: f64) -> Self {
        Self::new(Category::ALL.iter().map(|c| {
            let value = if matches!(c, Category::I | Category::II) {
                high
            } else {
                low
            };
            (*c, value)
        }))
    }

    pub fn get(&self, category: Category) -> Result<f64, EngineError> {
        self.values
            .get(&category)
            .copied()
            .ok_or_else(|| EngineError::UnknownCategory(category.to_string()))
    }

    pub fn try_get(&self, category: Category) -> Option<f64> {
        self.values.get(&category).copied()
    }
}

impl TryFrom<BTreeMap<String, f64>> for CategoryTable {
    type Error = CategoryParseError;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut values = BTreeMap::new();
        for (key, value) in raw {
            values.insert(key.parse::<Category>()?, value);
        }
        Ok(Self { values })
    }
}

impl From<CategoryTable> for BTreeMap<String, f64> {
    fn from(table: CategoryTable) -> Self {
        table
            .values
            .into_iter()
            .map(|(category, value)| (category.as_roman().to_string(), value))
            .collect()
    }
}
