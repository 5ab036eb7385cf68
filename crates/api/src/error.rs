use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use validator::ValidationErrors;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error responses:
/// request validation failures map to 400 `INVALID_REQUEST`, storage
/// failures to 502 `SERVICE_ERROR`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request body failed field validation.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationErrors),

    /// The catalog store could not complete an operation.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "INVALID_REQUEST",
                validation_message(errors),
            ),
            AppError::Database(err) => {
                tracing::error!(error = %err, "Catalog store error");
                (
                    StatusCode::BAD_GATEWAY,
                    "SERVICE_ERROR",
                    "The catalog store could not complete the operation".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Flatten field validation errors into one readable message.
fn validation_message(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |e| match &e.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: invalid value"),
            })
        })
        .collect();

    // field_errors() iterates a HashMap; sort for a stable message.
    parts.sort();
    parts.join("; ")
}
