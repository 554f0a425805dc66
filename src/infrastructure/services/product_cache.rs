//! Cache-aside storage for product listings

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::cache::{Cache, CacheExt, CacheNamespace, ListQuery};
use crate::domain::product::{Category, Product};
use crate::domain::DomainError;

/// Bound on a single cache call unless configured otherwise
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_millis(500);

/// Per-category cache of product listings
///
/// Consistency is weak. A write invalidates the namespace before
/// it returns, but a read that raced the write may still return or store the
/// previous listing. Staleness is bounded by the TTL.
///
/// The cache never fails an operation: lookup errors, timeouts and
/// undecodable entries are misses, store and invalidation errors are logged
/// and dropped.
#[derive(Debug, Clone)]
pub struct ProductCache {
    cache: Arc<dyn Cache>,
    namespace: CacheNamespace,
    ttl: Duration,
    timeout: Duration,
}

impl ProductCache {
    pub fn new(cache: Arc<dyn Cache>, category: Category, ttl: Duration) -> Self {
        Self {
            cache,
            namespace: CacheNamespace::for_category(category),
            ttl,
            timeout: DEFAULT_CACHE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the cached listing, `None` on a miss
    ///
    /// `Some(vec![])` is a cached empty listing, not a miss.
    pub async fn lookup(&self, query: &ListQuery) -> Option<Vec<Product>> {
        let key = self.namespace.key(query);

        let result: Result<Option<Vec<Product>>, DomainError> =
            self.bounded(self.cache.get(&key)).await;

        match result {
            Ok(Some(products)) => {
                debug!(key = %key, count = products.len(), "Cache hit");
                Some(products)
            }
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cache lookup failed, treating as miss");
                None
            }
        }
    }

    /// Writes a listing, replacing any previous entry for the query
    pub async fn store(&self, query: &ListQuery, products: &[Product], ttl: Duration) {
        let key = self.namespace.key(query);

        if let Err(e) = self.bounded(self.cache.set(&key, products, ttl)).await {
            warn!(key = %key, error = %e, "Failed to store listing in cache");
        }
    }

    /// Writes a listing with the configured TTL
    pub async fn store_default(&self, query: &ListQuery, products: &[Product]) {
        self.store(query, products, self.ttl).await
    }

    /// Drops every cached listing of the category
    pub async fn invalidate_all(&self) {
        let prefix = self.namespace.prefix();

        match self.bounded(self.cache.delete_prefix(prefix)).await {
            Ok(deleted) => debug!(prefix = %prefix, deleted, "Invalidated cached listings"),
            Err(e) => warn!(prefix = %prefix, error = %e, "Failed to invalidate cached listings"),
        }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::cache(format!(
                "Cache call timed out after {} ms",
                self.timeout.as_millis()
            ))),
        }
    }
}
