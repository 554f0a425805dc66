//! In-memory cache implementation using moka

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
    /// Upper bound on any entry's lifetime; per-entry TTLs are enforced on read
    pub max_ttl: Duration,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            max_ttl: Duration::from_secs(3600),
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub fn with_max_ttl(mut self, ttl: Duration) -> Self {
        self.max_ttl = ttl;
        self
    }
}

/// Cache entry stored in moka
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Serialized JSON value
    data: String,
    /// Expiration timestamp (millis since epoch)
    expires_at: u64,
}

/// Process-local cache backed by moka
///
/// Entries carry their own expiry so short TTLs work regardless of the
/// cache-wide time-to-live.
#[derive(Debug)]
pub struct InMemoryCache {
    cache: MokaCache<String, CacheEntry>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.max_ttl)
            .build();

        Self { cache }
    }

    fn current_time_millis() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn is_expired(entry: &CacheEntry) -> bool {
        Self::current_time_millis() >= entry.expires_at
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        match self.cache.get(key).await {
            Some(entry) => {
                if Self::is_expired(&entry) {
                    self.cache.remove(key).await;
                    return Ok(None);
                }

                Ok(Some(entry.data))
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let expires_at = Self::current_time_millis() + ttl.as_millis() as u64;
        let entry = CacheEntry {
            data: value.to_string(),
            expires_at,
        };

        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, DomainError> {
        self.cache.run_pending_tasks().await;

        let cache = self.cache.clone();
        let prefix = prefix.to_string();

        tokio::task::spawn_blocking(move || {
            cache
                .iter()
                .filter(|(key, entry)| key.starts_with(&prefix) && !Self::is_expired(entry))
                .map(|(key, _)| key.to_string())
                .collect::<Vec<String>>()
        })
        .await
        .map_err(|e| DomainError::cache(format!("Failed to iterate cache: {}", e)))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::CacheExt;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", "value1", Duration::from_secs(60))
            .await
            .unwrap();

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert_eq!(result, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let cache = InMemoryCache::new();

        let result: Option<String> = cache.get("missing").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = InMemoryCache::new();

        cache.set_raw("key1", "[1]", Duration::from_secs(60)).await.unwrap();
        cache.set_raw("key1", "[2]", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get_raw("key1").await.unwrap(), Some("[2]".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", "value1", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(cache.delete("key1").await.unwrap());
        assert!(!cache.delete("key1").await.unwrap());

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", "value1", Duration::from_millis(50))
            .await
            .unwrap();

        assert!(cache.get_raw("key1").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_keys_with_prefix() {
        let cache = InMemoryCache::new();
        let ttl = Duration::from_secs(60);

        cache.set_raw("fruits:all", "[]", ttl).await.unwrap();
        cache.set_raw("fruits:search:Apple", "[]", ttl).await.unwrap();
        cache.set_raw("vegetables:all", "[]", ttl).await.unwrap();

        let mut keys = cache.keys_with_prefix("fruits:").await.unwrap();
        keys.sort();

        assert_eq!(keys, vec!["fruits:all", "fruits:search:Apple"]);
    }

    #[tokio::test]
    async fn test_keys_with_prefix_skips_expired() {
        let cache = InMemoryCache::new();

        cache
            .set_raw("fruits:all", "[]", Duration::from_millis(20))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(cache.keys_with_prefix("fruits:").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_prefix() {
        let cache = InMemoryCache::new();
        let ttl = Duration::from_secs(60);

        cache.set_raw("fruits:all", "[]", ttl).await.unwrap();
        cache.set_raw("fruits:search:Pear", "[]", ttl).await.unwrap();
        cache.set_raw("vegetables:all", "[]", ttl).await.unwrap();

        let deleted = cache.delete_prefix("fruits:").await.unwrap();

        assert_eq!(deleted, 2);
        assert!(cache.get_raw("fruits:all").await.unwrap().is_none());
        assert!(cache.get_raw("vegetables:all").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_ping() {
        let cache = InMemoryCache::new();

        assert!(cache.ping().await.is_ok());
        assert_eq!(cache.backend_name(), "memory");
    }
}
