//! Product repository trait

use async_trait::async_trait;

use super::{NewProduct, Product, ProductId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Persistent store for the products of a single category
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Inserts a product, returning it with its assigned ID
    async fn insert(&self, product: NewProduct) -> Result<Product, DomainError>;

    /// Inserts several products at once. Either all are stored or none.
    async fn insert_batch(&self, products: Vec<NewProduct>) -> Result<Vec<Product>, DomainError>;

    /// Deletes a product by ID, returns true if it existed
    async fn delete(&self, id: ProductId) -> Result<bool, DomainError>;

    /// Finds a product by ID
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, DomainError>;

    /// Lists every product, ordered by name
    async fn find_all(&self) -> Result<Vec<Product>, DomainError>;

    /// Lists products whose name contains the term (case-insensitive), ordered by name
    async fn find_by_search(&self, term: &str) -> Result<Vec<Product>, DomainError>;

    /// Verifies the backing store is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}
