//! Product service - add, remove and list products of one category

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::cache::ListQuery;
use crate::domain::product::{
    validate_name, validate_new_product, validate_quantity, Category, NewProduct, Product,
    ProductId, ProductRepository, ProductView, Unit,
};
use crate::domain::DomainError;

use super::product_cache::ProductCache;

/// Result of a remove request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// Category service for fruits or vegetables
///
/// Writes go to the repository first and then invalidate the category's
/// cached listings. Reads go through the cache.
pub struct ProductService {
    category: Category,
    repository: Arc<dyn ProductRepository>,
    cache: ProductCache,
}

impl std::fmt::Debug for ProductService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductService")
            .field("category", &self.category)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl ProductService {
    pub fn new(
        category: Category,
        repository: Arc<dyn ProductRepository>,
        cache: ProductCache,
    ) -> Self {
        Self {
            category,
            repository,
            cache,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Adds a product and returns it with its quantity in grams
    ///
    /// The quantity is checked both as given and once converted, so a value
    /// that overflows to infinity in grams is rejected.
    pub async fn add(
        &self,
        name: &str,
        quantity: f64,
        unit: Unit,
    ) -> Result<ProductView, DomainError> {
        validate_name(name).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_quantity(quantity).map_err(|e| DomainError::validation(e.to_string()))?;

        let product = NewProduct::new(self.category, name, quantity, unit);
        validate_new_product(&product).map_err(|e| DomainError::validation(e.to_string()))?;

        let created = self.repository.insert(product).await.map_err(|e| {
            error!(category = %self.category, error = %e, "Failed to insert product");
            e
        })?;

        self.cache.invalidate_all().await;

        info!(
            category = %self.category,
            product_id = %created.id(),
            quantity_grams = created.quantity_grams(),
            "Product added"
        );

        Ok(created.view(Unit::Grams))
    }

    /// Removes a product by ID
    ///
    /// A missing product is a negative outcome, not an error. The cache is
    /// only touched when a row was actually deleted.
    pub async fn remove(&self, id: ProductId) -> Result<RemoveOutcome, DomainError> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Ok(RemoveOutcome::NotFound);
        }

        let deleted = self.repository.delete(id).await.map_err(|e| {
            error!(
                category = %self.category,
                product_id = %id,
                error = %e,
                "Failed to delete product"
            );
            e
        })?;

        if !deleted {
            return Ok(RemoveOutcome::NotFound);
        }

        self.cache.invalidate_all().await;
        info!(category = %self.category, product_id = %id, "Product removed");

        Ok(RemoveOutcome::Removed)
    }

    /// Lists products, optionally filtered by a name search, in the given unit
    pub async fn list(
        &self,
        search: Option<&str>,
        unit: Unit,
    ) -> Result<Vec<ProductView>, DomainError> {
        let query = ListQuery::from_search(search);
        let products = self.read_through(&query).await?;

        Ok(products.iter().map(|p| p.view(unit)).collect())
    }

    /// Inserts a batch of products, all or nothing, returning how many were stored
    pub async fn import(&self, products: Vec<NewProduct>) -> Result<usize, DomainError> {
        if products.is_empty() {
            return Ok(0);
        }

        for product in &products {
            if product.category != self.category {
                return Err(DomainError::validation(format!(
                    "'{}' is a {}, not a {}",
                    product.name, product.category, self.category
                )));
            }

            validate_new_product(product).map_err(|e| {
                DomainError::validation(format!("Invalid product '{}': {}", product.name, e))
            })?;
        }

        let inserted = self.repository.insert_batch(products).await.map_err(|e| {
            error!(category = %self.category, error = %e, "Failed to import products");
            e
        })?;

        self.cache.invalidate_all().await;
        info!(category = %self.category, count = inserted.len(), "Products imported");

        Ok(inserted.len())
    }

    async fn read_through(&self, query: &ListQuery) -> Result<Vec<Product>, DomainError> {
        if let Some(products) = self.cache.lookup(query).await {
            return Ok(products);
        }

        let result = match query {
            ListQuery::All => self.repository.find_all().await,
            ListQuery::Search(term) => self.repository.find_by_search(term).await,
        };

        let products = result.map_err(|e| {
            error!(category = %self.category, error = %e, "Failed to list products");
            e
        })?;

        self.cache.store_default(query, &products).await;
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::cache::{Cache, MockCache};
    use crate::domain::product::MockProductRepository;
    use crate::infrastructure::cache::InMemoryCache;
    use crate::infrastructure::storage::InMemoryProductRepository;

    fn service_with(
        repository: Arc<dyn ProductRepository>,
        cache: Arc<dyn Cache>,
    ) -> ProductService {
        ProductService::new(
            Category::Fruit,
            repository,
            ProductCache::new(cache, Category::Fruit, Duration::from_secs(60)),
        )
    }

    fn in_memory_service() -> ProductService {
        service_with(
            Arc::new(InMemoryProductRepository::new(Category::Fruit)),
            Arc::new(InMemoryCache::new()),
        )
    }

    fn apple() -> Product {
        Product::new(ProductId::new(1), "Apple", 1500.0, Category::Fruit)
    }

    #[tokio::test]
    async fn test_add_converts_to_grams() {
        let service = in_memory_service();

        let view = service.add("Apple", 1.5, Unit::Kilograms).await.unwrap();

        assert_eq!(view.name, "Apple");
        assert_eq!(view.quantity, 1500.0);
        assert_eq!(view.unit, Unit::Grams);

        let listed = service.list(None, Unit::Kilograms).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].quantity, 1.5);
        assert_eq!(listed[0].unit, Unit::Kilograms);
    }

    #[tokio::test]
    async fn test_add_invalidates_cached_listing() {
        let service = in_memory_service();

        assert!(service.list(None, Unit::Grams).await.unwrap().is_empty());
        service.add("Pear", 300.0, Unit::Grams).await.unwrap();

        let listed = service.list(None, Unit::Grams).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Pear");
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_input() {
        let service = in_memory_service();

        let blank = service.add("  ", 1.0, Unit::Grams).await.unwrap_err();
        assert!(matches!(blank, DomainError::Validation { .. }));

        let negative = service.add("Apple", -1.0, Unit::Kilograms).await.unwrap_err();
        assert!(negative.to_string().contains("Quantity must be positive"));

        assert!(service.list(None, Unit::Grams).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_quantity_overflowing_in_grams() {
        let mut repository = MockProductRepository::new();
        repository.expect_insert().never();

        let cache = Arc::new(MockCache::new().with_raw_entry("fruits:all", "[]"));
        let service = service_with(Arc::new(repository), cache.clone());

        let err = service.add("Huge", 1e306, Unit::Kilograms).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(err.to_string().contains("Quantity must be positive"));
        assert!(cache.contains("fruits:all"));
    }

    #[tokio::test]
    async fn test_largest_accepted_quantity_stays_cacheable() {
        let service = in_memory_service();

        service.add("Heavy", 1e300, Unit::Kilograms).await.unwrap();
        service.list(None, Unit::Grams).await.unwrap();

        let cached = service.cache.lookup(&ListQuery::All).await.unwrap();
        assert_eq!(cached.len(), 1);
        assert!(cached[0].quantity_grams().is_finite());
    }

    #[tokio::test]
    async fn test_add_failure_leaves_cache_untouched() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_insert()
            .returning(|_| Err(DomainError::storage("disk full")));

        let cache = Arc::new(MockCache::new().with_raw_entry("fruits:all", "[]"));
        let service = service_with(Arc::new(repository), cache.clone());

        let result = service.add("Apple", 1.0, Unit::Grams).await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
        assert!(cache.contains("fruits:all"));
    }

    #[tokio::test]
    async fn test_remove_existing() {
        let service = in_memory_service();
        let added = service.add("Apple", 1.0, Unit::Grams).await.unwrap();
        service.list(None, Unit::Grams).await.unwrap();

        let outcome = service.remove(ProductId::new(added.id)).await.unwrap();

        assert_eq!(outcome, RemoveOutcome::Removed);
        assert!(service.list(None, Unit::Grams).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_touches_nothing() {
        let mut repository = MockProductRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));
        repository.expect_delete().never();

        let cache = Arc::new(MockCache::new().with_raw_entry("fruits:all", "[]"));
        let service = service_with(Arc::new(repository), cache.clone());

        let outcome = service.remove(ProductId::new(42)).await.unwrap();

        assert_eq!(outcome, RemoveOutcome::NotFound);
        assert!(cache.contains("fruits:all"));
    }

    #[tokio::test]
    async fn test_remove_lost_race_is_not_found() {
        let mut repository = MockProductRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(Some(apple())));
        repository.expect_delete().returning(|_| Ok(false));

        let cache = Arc::new(MockCache::new().with_raw_entry("fruits:all", "[]"));
        let service = service_with(Arc::new(repository), cache.clone());

        let outcome = service.remove(ProductId::new(1)).await.unwrap();

        assert_eq!(outcome, RemoveOutcome::NotFound);
        assert!(cache.contains("fruits:all"));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_repository() {
        let mut repository = MockProductRepository::new();
        repository.expect_find_all().times(1).returning(|| Ok(vec![apple()]));

        let service = service_with(Arc::new(repository), Arc::new(MockCache::new()));

        let first = service.list(None, Unit::Grams).await.unwrap();
        let second = service.list(None, Unit::Grams).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second[0].quantity, 1500.0);
    }

    #[tokio::test]
    async fn test_empty_listing_is_cached() {
        let mut repository = MockProductRepository::new();
        repository.expect_find_all().times(1).returning(|| Ok(Vec::new()));

        let service = service_with(Arc::new(repository), Arc::new(MockCache::new()));

        assert!(service.list(None, Unit::Grams).await.unwrap().is_empty());
        assert!(service.list(None, Unit::Grams).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_uses_its_own_key() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_find_by_search()
            .withf(|term| term.to_string() == "Apple")
            .times(1)
            .returning(|_| Ok(vec![apple()]));
        repository.expect_find_all().times(1).returning(|| Ok(Vec::new()));

        let cache = Arc::new(MockCache::new());
        let service = service_with(Arc::new(repository), cache.clone());

        assert_eq!(service.list(Some("Apple"), Unit::Grams).await.unwrap().len(), 1);
        assert!(service.list(None, Unit::Grams).await.unwrap().is_empty());
        assert!(cache.contains("fruits:search:Apple"));
        assert!(cache.contains("fruits:all"));

        service.cache.invalidate_all().await;
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_cache_outage_serves_from_store() {
        let mut repository = MockProductRepository::new();
        repository.expect_find_all().times(2).returning(|| Ok(vec![apple()]));

        let cache = Arc::new(MockCache::new().with_error("connection refused"));
        let service = service_with(Arc::new(repository), cache);

        assert_eq!(service.list(None, Unit::Grams).await.unwrap().len(), 1);
        assert_eq!(service.list(None, Unit::Grams).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_outage_fails_list() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_find_all()
            .returning(|| Err(DomainError::storage("connection reset")));

        let cache = Arc::new(MockCache::new());
        let service = service_with(Arc::new(repository), cache.clone());

        let result = service.list(None, Unit::Grams).await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_import_inserts_and_invalidates() {
        let service = in_memory_service();
        service.list(None, Unit::Grams).await.unwrap();

        let count = service
            .import(vec![
                NewProduct::new(Category::Fruit, "Apples", 20.0, Unit::Kilograms),
                NewProduct::new(Category::Fruit, "Pears", 3500.0, Unit::Grams),
            ])
            .await
            .unwrap();

        assert_eq!(count, 2);

        let listed = service.list(None, Unit::Grams).await.unwrap();
        assert_eq!(listed[0].name, "Apples");
        assert_eq!(listed[0].quantity, 20000.0);
    }

    #[tokio::test]
    async fn test_import_rejects_whole_batch() {
        let service = in_memory_service();

        let result = service
            .import(vec![
                NewProduct::new(Category::Fruit, "Apples", 20.0, Unit::Kilograms),
                NewProduct::new(Category::Fruit, "", 1.0, Unit::Grams),
            ])
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert!(service.list(None, Unit::Grams).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_rejects_other_category() {
        let service = in_memory_service();

        let result = service
            .import(vec![NewProduct::new(Category::Vegetable, "Leek", 1.0, Unit::Grams)])
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_import_empty_is_noop() {
        let mut repository = MockProductRepository::new();
        repository.expect_insert_batch().never();

        let service = service_with(Arc::new(repository), Arc::new(MockCache::new()));

        assert_eq!(service.import(Vec::new()).await.unwrap(), 0);
    }
}
