//! Produce Inventory API
//!
//! Fruit and vegetable stock behind a small HTTP API:
//! - Quantities stored in grams, rendered in grams or kilograms
//! - Cache-aside listings with per-category invalidation
//! - In-memory or PostgreSQL storage, in-memory or Redis cache
//! - JSON file import

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use domain::{Cache, Category};
use infrastructure::{
    cache::{CacheConfig, CacheFactory},
    services::{HealthService, ProductCache, ProductService},
    storage::{ProductRepositories, StorageConfig, StorageFactory},
};
use tracing::info;

/// Create the application state with the default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state, connecting the configured backends
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = StorageConfig::from_settings(&config.storage)?;
    let repositories = StorageFactory::create(&storage_config).await?;

    let cache_config = CacheConfig::from_settings(&config.cache)?;
    let cache = CacheFactory::new().create(&cache_config).await?;

    info!(
        storage = ?storage_config.storage_type(),
        cache = cache.backend_name(),
        ttl_secs = config.cache.ttl_secs,
        "Backends ready"
    );

    Ok(build_app_state(repositories, cache, config))
}

/// Wires services around already created backends
pub fn build_app_state(
    repositories: ProductRepositories,
    cache: Arc<dyn Cache>,
    config: &AppConfig,
) -> AppState {
    let ttl = Duration::from_secs(config.cache.ttl_secs);
    let timeout = Duration::from_millis(config.cache.timeout_ms);

    let fruits = Arc::new(ProductService::new(
        Category::Fruit,
        repositories.fruits.clone(),
        ProductCache::new(cache.clone(), Category::Fruit, ttl).with_timeout(timeout),
    ));
    let vegetables = Arc::new(ProductService::new(
        Category::Vegetable,
        repositories.vegetables,
        ProductCache::new(cache.clone(), Category::Vegetable, ttl).with_timeout(timeout),
    ));

    // Both tables share one pool, probing either covers the database
    let health = Arc::new(HealthService::new(repositories.fruits, cache));

    AppState::new(
        fruits,
        vegetables,
        health,
        config.app.environment.clone(),
        config.import.file_path.clone(),
    )
}
