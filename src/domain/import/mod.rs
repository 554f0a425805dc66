//! Import domain - JSON product lists and category splitting

use serde::{Deserialize, Serialize};

use crate::domain::product::{to_grams, Category, NewProduct, Unit};
use crate::domain::DomainError;

/// One entry of an import file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub quantity: f64,
    pub unit: Unit,
}

impl ImportRecord {
    /// Returns the same record expressed in grams
    pub fn in_grams(self) -> Self {
        Self {
            quantity: to_grams(self.quantity, self.unit),
            unit: Unit::Grams,
            ..self
        }
    }

    pub fn into_new_product(self) -> NewProduct {
        NewProduct::new(self.category, self.name, self.quantity, self.unit)
    }
}

/// Import records grouped by category
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SplitProducts {
    pub fruits: Vec<ImportRecord>,
    pub vegetables: Vec<ImportRecord>,
}

impl SplitProducts {
    pub fn is_empty(&self) -> bool {
        self.fruits.is_empty() && self.vegetables.is_empty()
    }

    pub fn for_category(&self, category: Category) -> &[ImportRecord] {
        match category {
            Category::Fruit => &self.fruits,
            Category::Vegetable => &self.vegetables,
        }
    }
}

/// Parses a JSON array of import records
///
/// The whole document is rejected if any record is malformed.
pub fn parse_product_list(json: &str) -> Result<Vec<ImportRecord>, DomainError> {
    serde_json::from_str(json)
        .map_err(|e| DomainError::validation(format!("Invalid product list: {}", e)))
}

/// Splits records by category, keeping their original order
pub fn split_by_category(records: Vec<ImportRecord>) -> SplitProducts {
    let mut split = SplitProducts::default();

    for record in records {
        match record.category {
            Category::Fruit => split.fruits.push(record),
            Category::Vegetable => split.vegetables.push(record),
        }
    }

    split
}
