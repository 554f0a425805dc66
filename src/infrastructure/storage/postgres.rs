//! PostgreSQL product repository with connection pooling

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::config::StorageSettings;
use crate::domain::product::{Category, NewProduct, Product, ProductId, ProductRepository};
use crate::domain::DomainError;

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Pool acquire timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/produce_inventory".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Builds the pool configuration from the `storage` config section
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, DomainError> {
        let url = settings.database_url.clone().ok_or_else(|| {
            DomainError::configuration("storage.database_url is required for the postgres backend")
        })?;

        Ok(Self::new(url)
            .with_max_connections(settings.max_connections)
            .with_min_connections(settings.min_connections)
            .with_connect_timeout(settings.connect_timeout_secs)
            .with_idle_timeout(settings.idle_timeout_secs))
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn with_idle_timeout(mut self, secs: u64) -> Self {
        self.idle_timeout_secs = secs;
        self
    }

    /// Opens a connection pool
    pub async fn connect(&self) -> Result<PgPool, DomainError> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .connect(&self.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
    }
}

/// Escapes LIKE metacharacters so the term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());

    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Product table for one category, named after the category's plural form
pub struct PostgresProductRepository {
    pool: PgPool,
    category: Category,
}

impl Debug for PostgresProductRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresProductRepository")
            .field("table", &self.table())
            .finish()
    }
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool, category: Category) -> Self {
        Self { pool, category }
    }

    fn table(&self) -> &'static str {
        self.category.plural()
    }

    fn to_product(&self, row: &PgRow) -> Product {
        let id: i64 = row.get("id");
        let name: String = row.get("name");
        let quantity_grams: f64 = row.get("quantity_grams");

        Product::new(ProductId::new(id), name, quantity_grams, self.category)
    }

    fn check_category(&self, product: &NewProduct) -> Result<(), DomainError> {
        if product.category != self.category {
            return Err(DomainError::internal(format!(
                "Cannot store a {} in the {} table",
                product.category,
                self.table()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn insert(&self, product: NewProduct) -> Result<Product, DomainError> {
        self.check_category(&product)?;

        let query = format!(
            "INSERT INTO {} (name, quantity_grams) VALUES ($1, $2) RETURNING id, name, quantity_grams",
            self.table()
        );

        let row = sqlx::query(&query)
            .bind(&product.name)
            .bind(product.quantity_grams)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to insert product: {}", e)))?;

        Ok(self.to_product(&row))
    }

    async fn insert_batch(&self, products: Vec<NewProduct>) -> Result<Vec<Product>, DomainError> {
        for product in &products {
            self.check_category(product)?;
        }

        let query = format!(
            "INSERT INTO {} (name, quantity_grams) VALUES ($1, $2) RETURNING id, name, quantity_grams",
            self.table()
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let mut inserted = Vec::with_capacity(products.len());

        for product in &products {
            let row = sqlx::query(&query)
                .bind(&product.name)
                .bind(product.quantity_grams)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to insert product: {}", e)))?;

            inserted.push(self.to_product(&row));
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;

        Ok(inserted)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, DomainError> {
        let query = format!("DELETE FROM {} WHERE id = $1", self.table());

        let result = sqlx::query(&query)
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete product: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        let query = format!(
            "SELECT id, name, quantity_grams FROM {} WHERE id = $1",
            self.table()
        );

        let row = sqlx::query(&query)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get product: {}", e)))?;

        Ok(row.map(|row| self.to_product(&row)))
    }

    async fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        let query = format!(
            "SELECT id, name, quantity_grams FROM {} ORDER BY name, id",
            self.table()
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list products: {}", e)))?;

        Ok(rows.iter().map(|row| self.to_product(row)).collect())
    }

    async fn find_by_search(&self, term: &str) -> Result<Vec<Product>, DomainError> {
        let query = format!(
            "SELECT id, name, quantity_grams FROM {} WHERE name ILIKE $1 ESCAPE '\\' ORDER BY name, id",
            self.table()
        );
        let pattern = format!("%{}%", escape_like(term));

        let rows = sqlx::query(&query)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to search products: {}", e)))?;

        Ok(rows.iter().map(|row| self.to_product(row)).collect())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Database ping failed: {}", e)))?;

        Ok(())
    }
}
