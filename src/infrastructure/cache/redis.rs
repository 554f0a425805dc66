//! Redis cache implementation

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};
use tokio::sync::OnceCell;
use tracing::warn;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

/// Number of keys requested per SCAN round trip
const SCAN_BATCH: usize = 100;

/// Upper bound of the backoff between reconnection attempts, in milliseconds
const MAX_RETRY_DELAY_MS: u64 = 1_000;

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Prefix prepended to every key, hidden from callers
    pub key_prefix: Option<String>,
    /// Bound on connecting and on each command's response
    pub timeout: Duration,
    /// Reconnection attempts before a command fails
    pub max_retries: usize,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
            timeout: Duration::from_millis(500),
            max_retries: 2,
        }
    }
}

impl RedisCacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn manager_config(&self) -> ConnectionManagerConfig {
        ConnectionManagerConfig::new()
            .set_number_of_retries(self.max_retries)
            .set_max_delay(MAX_RETRY_DELAY_MS)
            .set_connection_timeout(self.timeout)
            .set_response_timeout(self.timeout)
    }
}

/// Redis cache over a multiplexed `ConnectionManager`
///
/// The connection is established lazily. If Redis is down at startup the
/// cache is still created, every call fails until a later call manages to
/// connect.
///
/// Individual commands are atomic. Prefix deletion is not: keys written
/// between the SCAN and the DEL survive it.
#[derive(Clone)]
pub struct RedisCache {
    client: Client,
    connection: Arc<OnceCell<ConnectionManager>>,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .field("connected", &self.connection.initialized())
            .finish()
    }
}

impl RedisCache {
    /// Creates the cache and attempts a first connection
    ///
    /// Only an invalid URL is an error. An unreachable server is logged.
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let cache = Self {
            client,
            connection: Arc::new(OnceCell::new()),
            config,
        };

        if let Err(e) = cache.connection().await {
            warn!(
                error = %e,
                "Redis unreachable, serving listings from the store until it recovers"
            );
        }

        Ok(cache)
    }

    async fn connection(&self) -> Result<ConnectionManager, DomainError> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                ConnectionManager::new_with_config(
                    self.client.clone(),
                    self.config.manager_config(),
                )
                .await
                .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))
            })
            .await?;

        Ok(manager.clone())
    }

    fn prefix_key(&self, key: &str) -> String {
        prefixed(self.config.key_prefix.as_deref(), key)
    }

    fn strip_prefix(&self, key: String) -> String {
        strip(self.config.key_prefix.as_deref(), key)
    }
}

fn prefixed(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}{}", prefix, key),
        None => key.to_string(),
    }
}

fn strip(prefix: Option<&str>, key: String) -> String {
    match prefix.and_then(|p| key.strip_prefix(p)) {
        Some(rest) => rest.to_string(),
        None => key,
    }
}

/// Escapes glob metacharacters so a literal prefix can be used in MATCH
fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());

    for c in literal.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

#[async_trait]
impl Cache for RedisCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;

        let result: Option<String> = conn.get(&prefixed_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        Ok(result)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;

        let _: () = conn
            .pset_ex(&prefixed_key, value, ttl.as_millis().max(1) as u64)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;

        let deleted: i32 = conn.del(&prefixed_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to delete key '{}': {}", key, e))
        })?;

        Ok(deleted > 0)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, DomainError> {
        let pattern = format!("{}*", escape_glob(&self.prefix_key(prefix)));
        let mut conn = self.connection().await?;

        let mut cursor = 0u64;
        let mut found = Vec::new();

        loop {
            let (new_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache(format!("Failed to scan prefix '{}': {}", prefix, e))
                })?;

            found.extend(keys.into_iter().map(|key| self.strip_prefix(key)));
            cursor = new_cursor;

            if cursor == 0 {
                break;
            }
        }

        // SCAN may return a key more than once
        found.sort();
        found.dedup();

        Ok(found)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Redis ping failed: {}", e)))?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
