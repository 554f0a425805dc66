//! Infrastructure services

mod health_service;
mod import_service;
mod product_cache;
mod product_service;

pub use health_service::{CheckStatus, HealthReport, HealthService, HealthStatus, ServiceHealth};
pub use import_service::{ImportReport, ImportService, NO_PRODUCTS_MESSAGE};
pub use product_cache::ProductCache;
pub use product_service::{ProductService, RemoveOutcome};
