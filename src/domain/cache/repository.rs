//! Cache trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::DomainError;

/// Key-value cache with per-entry TTL
///
/// Values are JSON strings so the trait stays dyn-compatible.
/// Use [`CacheExt`] for typed get/set.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Gets a raw JSON value, `None` if absent or expired
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Sets a raw JSON value with a TTL, overwriting any previous value
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    /// Deletes a value, returns true if it existed
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Lists every live key starting with the prefix
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, DomainError>;

    /// Deletes every key starting with the prefix, one by one
    async fn delete_prefix(&self, prefix: &str) -> Result<usize, DomainError> {
        let keys = self.keys_with_prefix(prefix).await?;
        let mut deleted = 0;

        for key in keys {
            if self.delete(&key).await? {
                deleted += 1;
            }
        }

        Ok(deleted)
    }

    /// Verifies the cache backend is reachable
    async fn ping(&self) -> Result<(), DomainError>;

    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;
}

/// Extension trait providing typed get/set operations
pub trait CacheExt: Cache {
    /// Gets a typed value from the cache
    fn get<'a, V>(
        &'a self,
        key: &'a str,
    ) -> impl std::future::Future<Output = Result<Option<V>, DomainError>> + Send
    where
        V: DeserializeOwned + Send,
    {
        async move {
            match self.get_raw(key).await? {
                Some(data) => {
                    let value: V = serde_json::from_str(&data).map_err(|e| {
                        DomainError::cache(format!("Failed to deserialize cache value: {}", e))
                    })?;
                    Ok(Some(value))
                }
                None => Ok(None),
            }
        }
    }

    /// Sets a typed value in the cache with a TTL
    fn set<'a, V>(
        &'a self,
        key: &'a str,
        value: &'a V,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<(), DomainError>> + Send
    where
        V: Serialize + Send + Sync + ?Sized,
    {
        async move {
            let data = serde_json::to_string(value).map_err(|e| {
                DomainError::cache(format!("Failed to serialize cache value: {}", e))
            })?;
            self.set_raw(key, &data, ttl).await
        }
    }
}

// Blanket implementation for all types implementing Cache
impl<T: Cache + ?Sized> CacheExt for T {}
