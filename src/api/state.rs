//! Application state for shared services

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::Category;
use crate::infrastructure::services::{HealthService, ImportService, ProductService};

/// Application state shared by all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub fruits: Arc<ProductService>,
    pub vegetables: Arc<ProductService>,
    pub import: Arc<ImportService>,
    pub health: Arc<HealthService>,
    /// Deployment environment reported by `/health`
    pub environment: String,
    /// Import file served by `/api/file_content`
    pub import_path: PathBuf,
}

impl AppState {
    pub fn new(
        fruits: Arc<ProductService>,
        vegetables: Arc<ProductService>,
        health: Arc<HealthService>,
        environment: impl Into<String>,
        import_path: impl Into<PathBuf>,
    ) -> Self {
        let import = Arc::new(ImportService::new(fruits.clone(), vegetables.clone()));

        Self {
            fruits,
            vegetables,
            import,
            health,
            environment: environment.into(),
            import_path: import_path.into(),
        }
    }

    /// Service owning the given category
    pub fn products(&self, category: Category) -> &Arc<ProductService> {
        match category {
            Category::Fruit => &self.fruits,
            Category::Vegetable => &self.vegetables,
        }
    }
}
