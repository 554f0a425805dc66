//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::types::Json;
use crate::infrastructure::services::{HealthStatus, ServiceHealth};

use super::state::AppState;

/// Status of the individual dependencies
#[derive(Debug, Serialize)]
pub struct ServicesHealth {
    pub database: ServiceHealth,
    pub redis: ServiceHealth,
    pub application: &'static str,
}

/// Body of `/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
    pub services: ServicesHealth,
}

/// Probes the store and the cache. 200 when both answer, 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.health.check().await;

    let status_code = match report.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    let response = HealthResponse {
        status: report.status,
        timestamp: Utc::now(),
        environment: state.environment.clone(),
        services: ServicesHealth {
            database: report.database,
            redis: report.cache,
            application: "ok",
        },
    };

    (status_code, Json(response))
}

/// Liveness probe - returns 200 if the process is running
pub async fn live_check() -> StatusCode {
    StatusCode::OK
}
