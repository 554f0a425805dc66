//! In-memory product repository

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::product::{Category, NewProduct, Product, ProductId, ProductRepository};
use crate::domain::DomainError;

#[derive(Debug)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Product>,
}

impl Table {
    fn insert(&mut self, product: NewProduct) -> Product {
        let id = ProductId::new(self.next_id);
        self.next_id += 1;

        let product = product.into_product(id);
        self.rows.insert(id.value(), product.clone());
        product
    }
}

/// Thread-safe in-memory product table for one category
///
/// Useful for testing and development. Data is lost when the process terminates.
/// IDs start at 1 and are never reused.
#[derive(Debug)]
pub struct InMemoryProductRepository {
    category: Category,
    table: RwLock<Table>,
}

impl InMemoryProductRepository {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            table: RwLock::new(Table {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    fn sorted_by_name(mut products: Vec<Product>) -> Vec<Product> {
        products.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        products
    }

    fn check_category(&self, product: &NewProduct) -> Result<(), DomainError> {
        if product.category != self.category {
            return Err(DomainError::internal(format!(
                "Cannot store a {} in the {} table",
                product.category,
                self.category.plural()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: NewProduct) -> Result<Product, DomainError> {
        self.check_category(&product)?;

        let mut table = self.table.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(table.insert(product))
    }

    async fn insert_batch(&self, products: Vec<NewProduct>) -> Result<Vec<Product>, DomainError> {
        for product in &products {
            self.check_category(product)?;
        }

        let mut table = self.table.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(products.into_iter().map(|p| table.insert(p)).collect())
    }

    async fn delete(&self, id: ProductId) -> Result<bool, DomainError> {
        let mut table = self.table.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(table.rows.remove(&id.value()).is_some())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        let table = self.table.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(table.rows.get(&id.value()).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        let table = self.table.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(Self::sorted_by_name(table.rows.values().cloned().collect()))
    }

    async fn find_by_search(&self, term: &str) -> Result<Vec<Product>, DomainError> {
        let needle = term.to_lowercase();
        let table = self.table.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let matches = table
            .rows
            .values()
            .filter(|p| p.name().to_lowercase().contains(&needle))
            .cloned()
            .collect();

        Ok(Self::sorted_by_name(matches))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
