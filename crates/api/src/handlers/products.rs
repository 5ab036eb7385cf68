//! Handlers for the product catalog resource.
//!
//! The list endpoint accepts arbitrary query parameters; everything is
//! funneled through [`ListQuery::from_params`] with the allow-lists below,
//! so unknown parameter names are dropped before they can reach SQL.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use merx_core::query::ListQuery;
use merx_db::models::{CreateProduct, ProductCreated};
use merx_db::repositories::ProductRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::state::AppState;

/// Sort keys accepted by the list endpoint, mapped to column names.
const ALLOWED_SORTS: &[(&str, &str)] = &[
    ("id", "id"),
    ("product_code", "product_code"),
    ("product_group", "product_group"),
    ("product_description", "product_description"),
    ("product_number_code", "product_number_code"),
];

/// Filter params accepted by the list endpoint, mapped to column names.
///
/// `_id` matches the identity exactly; the text columns match as
/// case-insensitive substrings.
const ALLOWED_FILTERS: &[(&str, &str)] = &[
    ("_id", "id"),
    ("product_code", "product_code"),
    ("product_group", "product_group"),
    ("product_description", "product_description"),
    ("product_number_code", "product_number_code"),
];

/// POST /api/v1/product
///
/// Validate and persist one product, returning its assigned identity.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let id = ProductRepo::create(&state.pool, &input).await?;

    tracing::info!(%id, product_code = %input.product_code, "Product created");

    Ok(Json(ProductCreated { id: id.to_string() }))
}

/// GET /api/v1/product
///
/// Paginated, filtered, sorted catalog listing. Never rejects a query:
/// out-of-range pagination falls back to defaults and disallowed
/// sort/filter names are ignored.
pub async fn list(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<impl IntoResponse> {
    // The first occurrence of a repeated parameter wins.
    let mut params: HashMap<String, String> = HashMap::new();
    for (key, value) in pairs {
        params.entry(key).or_insert(value);
    }

    let query = ListQuery::from_params(&params, ALLOWED_SORTS, ALLOWED_FILTERS);

    let page = ProductRepo::list(&state.pool, &query).await?;

    Ok(Json(page))
}
