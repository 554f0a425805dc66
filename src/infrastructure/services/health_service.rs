//! Health service - probes the product store and the cache

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::warn;

use crate::domain::cache::Cache;
use crate::domain::product::ProductRepository;
use crate::domain::DomainError;

/// Overall health status
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Result of a single dependency probe
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
}

/// Health of one dependency
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ServiceHealth {
    pub status: CheckStatus,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub latency_ms: u64,
}

impl ServiceHealth {
    /// Runs one probe, a probe slower than the timeout counts as failed
    async fn probe(
        check: impl Future<Output = Result<(), DomainError>>,
        timeout: Duration,
    ) -> Self {
        let started = Instant::now();
        let result = tokio::time::timeout(timeout, check)
            .await
            .unwrap_or_else(|_| {
                Err(DomainError::internal(format!(
                    "No answer within {} ms",
                    timeout.as_millis()
                )))
            });
        let latency_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(()) => Self {
                status: CheckStatus::Ok,
                connected: true,
                error: None,
                latency_ms,
            },
            Err(e) => Self {
                status: CheckStatus::Error,
                connected: false,
                error: Some(e.message().to_string()),
                latency_ms,
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == CheckStatus::Ok
    }
}

/// Aggregated health of the service dependencies
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub database: ServiceHealth,
    pub cache: ServiceHealth,
}

/// Bound on each dependency probe
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Runs the dependency probes
#[derive(Clone)]
pub struct HealthService {
    store: Arc<dyn ProductRepository>,
    cache: Arc<dyn Cache>,
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("cache", &self.cache.backend_name())
            .finish_non_exhaustive()
    }
}

impl HealthService {
    pub fn new(store: Arc<dyn ProductRepository>, cache: Arc<dyn Cache>) -> Self {
        Self { store, cache }
    }

    /// Probes both dependencies. Healthy only if both answer in time.
    pub async fn check(&self) -> HealthReport {
        let database = ServiceHealth::probe(self.store.ping(), PROBE_TIMEOUT).await;
        let cache = ServiceHealth::probe(self.cache.ping(), PROBE_TIMEOUT).await;

        let status = if database.is_ok() && cache.is_ok() {
            HealthStatus::Healthy
        } else {
            warn!(
                database = ?database.status,
                cache = ?cache.status,
                backend = self.cache.backend_name(),
                "Health check failed"
            );
            HealthStatus::Unhealthy
        };

        HealthReport {
            status,
            database,
            cache,
        }
    }
}
