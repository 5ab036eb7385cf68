//! Route definitions for the product catalog resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Routes mounted at `/product`.
///
/// ```text
/// GET  /   -> list
/// POST /   -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(products::list).post(products::create))
}
