//! Product entity, identifiers and categories

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::unit::{from_grams, to_grams, Unit};
use crate::domain::DomainError;

/// Store-assigned product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(ProductId)
            .map_err(|_| DomainError::validation(format!("Invalid product ID '{}'", s)))
    }
}

/// Product category. Each category has its own table and cache namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fruit,
    Vegetable,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Fruit, Category::Vegetable];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fruit => "fruit",
            Category::Vegetable => "vegetable",
        }
    }

    /// Plural form, used for table names and cache namespaces
    pub fn plural(&self) -> &'static str {
        match self {
            Category::Fruit => "fruits",
            Category::Vegetable => "vegetables",
        }
    }

    /// Capitalized name for user-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            Category::Fruit => "Fruit",
            Category::Vegetable => "Vegetable",
        }
    }

    pub fn plural_label(&self) -> &'static str {
        match self {
            Category::Fruit => "Fruits",
            Category::Vegetable => "Vegetables",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fruit" | "fruits" => Ok(Category::Fruit),
            "vegetable" | "vegetables" => Ok(Category::Vegetable),
            _ => Err(DomainError::not_found(format!("Unknown category '{}'", s))),
        }
    }
}

/// A persisted product. The quantity is always in grams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    quantity_grams: f64,
    category: Category,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        quantity_grams: f64,
        category: Category,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            quantity_grams,
            category,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity_grams(&self) -> f64 {
        self.quantity_grams
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Renders the product with its quantity in the requested unit
    pub fn view(&self, unit: Unit) -> ProductView {
        ProductView {
            id: self.id.value(),
            name: self.name.clone(),
            quantity: from_grams(self.quantity_grams, unit),
            unit,
        }
    }
}

/// A product that has not been assigned an ID yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub quantity_grams: f64,
    pub category: Category,
}

impl NewProduct {
    /// Builds a new product, converting the quantity to grams
    pub fn new(category: Category, name: impl Into<String>, quantity: f64, unit: Unit) -> Self {
        Self {
            name: name.into(),
            quantity_grams: to_grams(quantity, unit),
            category,
        }
    }

    pub fn into_product(self, id: ProductId) -> Product {
        Product::new(id, self.name, self.quantity_grams, self.category)
    }
}

/// Product as returned to API clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
}
