//! Preview of the configured import file

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use crate::api::state::AppState;
use crate::api::types::Json;
use crate::domain::DomainError;

#[derive(Debug, Serialize)]
struct FileContentError {
    error: String,
}

/// GET /api/file_content
///
/// Returns the import file split by category with quantities in grams.
/// Nothing is stored.
pub async fn file_content(State(state): State<AppState>) -> Response {
    match state.import.process_file(&state.import_path).await {
        Ok(split) => (StatusCode::OK, Json(split)).into_response(),
        Err(DomainError::Validation { message }) => {
            warn!(path = %state.import_path.display(), error = %message, "Import file rejected");
            (StatusCode::BAD_REQUEST, Json(FileContentError { error: message })).into_response()
        }
        Err(e) => {
            error!(path = %state.import_path.display(), error = %e, "Failed to read import file");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FileContentError {
                    error: format!("Internal server error: {}", e.message()),
                }),
            )
                .into_response()
        }
    }
}
