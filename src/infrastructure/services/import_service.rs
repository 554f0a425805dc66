//! Import service - bulk loading of products from JSON files

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::import::{parse_product_list, split_by_category, ImportRecord, SplitProducts};
use crate::domain::product::{Category, NewProduct};
use crate::domain::DomainError;

use super::product_service::ProductService;

/// Message reported when a file holds no products
pub const NO_PRODUCTS_MESSAGE: &str = "No products found in the file.";

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported_count: usize,
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Reads product files and imports them through the category services
#[derive(Debug, Clone)]
pub struct ImportService {
    fruits: Arc<ProductService>,
    vegetables: Arc<ProductService>,
}

impl ImportService {
    pub fn new(fruits: Arc<ProductService>, vegetables: Arc<ProductService>) -> Self {
        Self { fruits, vegetables }
    }

    /// Reads a file, converts every quantity to grams and splits it by category
    ///
    /// Nothing is persisted.
    pub async fn process_file(&self, path: &Path) -> Result<SplitProducts, DomainError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DomainError::validation(format!(
                    "File not found: {}",
                    path.display()
                )));
            }
            Err(e) => {
                return Err(DomainError::internal(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let records = parse_product_list(&content)?;
        let in_grams = records.into_iter().map(ImportRecord::in_grams).collect();

        Ok(split_by_category(in_grams))
    }

    /// Imports every product of a file
    ///
    /// Each category is imported independently: a failing category is
    /// reported in the errors while the other one is still stored.
    pub async fn import_file(&self, path: &Path) -> Result<ImportReport, DomainError> {
        let split = self.process_file(path).await?;

        if split.is_empty() {
            return Ok(ImportReport {
                imported_count: 0,
                errors: vec![NO_PRODUCTS_MESSAGE.to_string()],
            });
        }

        let mut report = ImportReport::default();

        for category in Category::ALL {
            let products: Vec<NewProduct> = split
                .for_category(category)
                .iter()
                .cloned()
                .map(ImportRecord::into_new_product)
                .collect();

            if products.is_empty() {
                continue;
            }

            match self.service(category).import(products).await {
                Ok(count) => report.imported_count += count,
                Err(e) => {
                    warn!(category = %category, error = %e, "Category import failed");
                    let stage = match e {
                        DomainError::Validation { .. } => "validation",
                        _ => "import",
                    };
                    report.errors.push(format!(
                        "{} {} failed: {}",
                        category.plural_label(),
                        stage,
                        e.message()
                    ));
                }
            }
        }

        info!(
            path = %path.display(),
            imported = report.imported_count,
            errors = report.errors.len(),
            "Import finished"
        );

        Ok(report)
    }

    fn service(&self, category: Category) -> &ProductService {
        match category {
            Category::Fruit => &self.fruits,
            Category::Vegetable => &self.vegetables,
        }
    }
}
