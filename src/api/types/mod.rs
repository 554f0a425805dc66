//! Request and response types shared by the handlers

pub mod error;
pub mod json;
pub mod response;

pub use error::{ApiError, ApiErrorResponse, VALIDATION_FAILED};
pub use json::{Json, INVALID_JSON};
pub use response::ApiResponse;
