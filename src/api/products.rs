//! Product endpoints, shared by fruits and vegetables

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::debug;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, Json};
use crate::domain::product::{validate_name, ProductValidationError, MAX_NAME_LENGTH};
use crate::domain::{Category, ProductId, ProductView, Unit};
use crate::infrastructure::services::RemoveOutcome;

/// Query string of the list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListProductsQuery {
    pub search: Option<String>,
    pub unit: Option<String>,
}

/// Body of the add endpoint
///
/// Missing fields fall back to values that fail validation, so the client
/// gets field messages instead of a decoding error.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddProductRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_product_name"))]
    pub name: String,
    #[serde(default)]
    #[validate(range(exclusive_min = 0.0, message = "Quantity must be positive"))]
    pub quantity: f64,
    #[serde(default = "default_unit")]
    #[validate(custom(function = "validate_unit"))]
    pub unit: String,
}

fn default_unit() -> String {
    Unit::Kilograms.as_str().to_string()
}

const BLANK_NAME: &str = "blank_name";
const NAME_TOO_LONG: &str = "name_too_long";

fn validate_product_name(name: &str) -> Result<(), ValidationError> {
    match validate_name(name) {
        Ok(()) => Ok(()),
        Err(ProductValidationError::BlankName) => Err(ValidationError::new(BLANK_NAME)),
        Err(ProductValidationError::NameTooLong { .. }) => Err(ValidationError::new(NAME_TOO_LONG)),
        Err(e) => Err(ValidationError::new("name").with_message(e.to_string().into())),
    }
}

fn validate_unit(unit: &str) -> Result<(), ValidationError> {
    unit.parse::<Unit>().map(|_| ()).map_err(|_| {
        ValidationError::new("unit").with_message("Unit must be either kg or g".into())
    })
}

/// Flattens validator output into messages, ordered by field
fn validation_messages(errors: &ValidationErrors, category: Category) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None if error.code == BLANK_NAME => {
                    format!("{} name cannot be blank", category.label())
                }
                None if error.code == NAME_TOO_LONG => format!(
                    "{} name cannot exceed {} characters",
                    category.label(),
                    MAX_NAME_LENGTH
                ),
                None => format!("Invalid {}", field),
            })
        })
        .collect()
}

fn parse_category(raw: &str) -> Result<Category, ApiError> {
    raw.parse::<Category>().map_err(ApiError::from)
}

/// GET /api/{category}
pub async fn list_products(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<ApiResponse<Vec<ProductView>>>, ApiError> {
    let category = parse_category(&category)?;
    let unit = match query.unit.as_deref() {
        Some(raw) => raw.parse::<Unit>()?,
        None => Unit::Grams,
    };

    debug!(%category, search = ?query.search, %unit, "Listing products");

    let products = state
        .products(category)
        .list(query.search.as_deref(), unit)
        .await
        .map_err(|e| {
            ApiError::from_domain(e, &format!("Failed to retrieve {}", category.plural()))
        })?;

    Ok(Json(ApiResponse::ok(
        format!("{} retrieved successfully", category.plural_label()),
        products,
    )))
}

/// POST /api/{category}
pub async fn add_product(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(request): Json<AddProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProductView>>), ApiError> {
    let category = parse_category(&category)?;

    request
        .validate()
        .map_err(|e| ApiError::validation_failed(validation_messages(&e, category)))?;

    let unit = request.unit.parse::<Unit>()?;
    let product = state
        .products(category)
        .add(&request.name, request.quantity, unit)
        .await
        .map_err(|e| ApiError::from_domain(e, &format!("Failed to add {}", category)))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            format!("{} added successfully", category.label()),
            product,
        )),
    ))
}

/// DELETE /api/{category}/{id}
pub async fn remove_product(
    State(state): State<AppState>,
    Path((category, id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let category = parse_category(&category)?;
    let id = id.parse::<ProductId>()?;

    let outcome = state
        .products(category)
        .remove(id)
        .await
        .map_err(|e| ApiError::from_domain(e, &format!("Failed to remove {}", category)))?;

    match outcome {
        RemoveOutcome::Removed => Ok(Json(ApiResponse::message(format!(
            "{} removed successfully",
            category.label()
        )))),
        RemoveOutcome::NotFound => Err(ApiError::not_found(format!(
            "{} not found",
            category.label()
        ))),
    }
}
