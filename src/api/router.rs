use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use tower_http::trace::TraceLayer;

use super::file_content;
use super::health;
use super::middleware::logging_middleware;
use super::products;
use super::state::AppState;

/// Create the router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Probes
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        // Static segment wins over the category parameter
        .route("/api/file_content", get(file_content::file_content))
        .route(
            "/api/{category}",
            get(products::list_products).post(products::add_product),
        )
        .route("/api/{category}/{id}", delete(products::remove_product))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
