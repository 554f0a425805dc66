//! Storage infrastructure - Product repository implementations

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{ProductRepositories, StorageConfig, StorageFactory, StorageType};
pub use in_memory::InMemoryProductRepository;
pub use migrations::{product_migrations, Migration, PostgresMigrator};
pub use postgres::{PostgresConfig, PostgresProductRepository};
