//! Storage factory for runtime storage selection

use std::sync::Arc;

use sqlx::postgres::PgPool;
use tracing::info;

use crate::config::StorageSettings;
use crate::domain::product::{Category, ProductRepository};
use crate::domain::DomainError;

use super::in_memory::InMemoryProductRepository;
use super::migrations::PostgresMigrator;
use super::postgres::{PostgresConfig, PostgresProductRepository};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl std::str::FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(DomainError::configuration(format!(
                "Unknown storage backend: {}. Valid backends: memory, postgres",
                s
            ))),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Builds the storage configuration from the `storage` config section
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, DomainError> {
        match settings.backend.parse::<StorageType>()? {
            StorageType::InMemory => Ok(Self::InMemory),
            StorageType::Postgres => Ok(Self::Postgres(PostgresConfig::from_settings(settings)?)),
        }
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// One repository per category
#[derive(Clone)]
pub struct ProductRepositories {
    pub fruits: Arc<dyn ProductRepository>,
    pub vegetables: Arc<dyn ProductRepository>,
}

impl std::fmt::Debug for ProductRepositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductRepositories").finish_non_exhaustive()
    }
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates both category repositories, running migrations for PostgreSQL
    pub async fn create(config: &StorageConfig) -> Result<ProductRepositories, DomainError> {
        info!(backend = ?config.storage_type(), "Creating product storage");

        match config {
            StorageConfig::InMemory => Ok(Self::create_in_memory()),
            StorageConfig::Postgres(pg_config) => {
                let pool = pg_config.connect().await?;
                let applied = PostgresMigrator::new(pool.clone()).run_all().await?;
                info!(applied, "Database migrations complete");

                Ok(Self::create_postgres_with_pool(pool))
            }
        }
    }

    pub fn create_in_memory() -> ProductRepositories {
        ProductRepositories {
            fruits: Arc::new(InMemoryProductRepository::new(Category::Fruit)),
            vegetables: Arc::new(InMemoryProductRepository::new(Category::Vegetable)),
        }
    }

    pub fn create_postgres_with_pool(pool: PgPool) -> ProductRepositories {
        ProductRepositories {
            fruits: Arc::new(PostgresProductRepository::new(pool.clone(), Category::Fruit)),
            vegetables: Arc::new(PostgresProductRepository::new(pool, Category::Vegetable)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::{NewProduct, Unit};

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!("memory".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!("in-memory".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!("postgres".parse::<StorageType>().unwrap(), StorageType::Postgres);
        assert_eq!("PG".parse::<StorageType>().unwrap(), StorageType::Postgres);
        assert!("sqlite".parse::<StorageType>().is_err());
    }

    #[test]
    fn test_storage_config_from_settings() {
        let memory = StorageConfig::from_settings(&StorageSettings::default()).unwrap();
        assert_eq!(memory.storage_type(), StorageType::InMemory);

        let settings = StorageSettings {
            backend: "postgres".to_string(),
            database_url: Some("postgres://localhost/test".to_string()),
            ..StorageSettings::default()
        };
        let postgres = StorageConfig::from_settings(&settings).unwrap();
        assert_eq!(postgres.storage_type(), StorageType::Postgres);
    }

    #[test]
    fn test_storage_config_postgres_without_url() {
        let settings = StorageSettings {
            backend: "postgres".to_string(),
            ..StorageSettings::default()
        };

        assert!(StorageConfig::from_settings(&settings).is_err());
    }

    #[tokio::test]
    async fn test_create_in_memory_separates_categories() {
        let repos = StorageFactory::create(&StorageConfig::InMemory).await.unwrap();

        repos
            .fruits
            .insert(NewProduct::new(Category::Fruit, "Apple", 1.0, Unit::Grams))
            .await
            .unwrap();

        assert_eq!(repos.fruits.find_all().await.unwrap().len(), 1);
        assert!(repos.vegetables.find_all().await.unwrap().is_empty());
    }
}
