//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ordering::OrderingError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Ordering engine error.
    Ordering(OrderingError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Ordering(err) => ordering_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn ordering_error_to_response(err: OrderingError) -> (StatusCode, String) {
    match &err {
        OrderingError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        OrderingError::ProductNotFound(_) | OrderingError::OrderNotFound(_) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        OrderingError::InsufficientStock { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        OrderingError::Store(inner) => {
            // Persistence failures are opaque to clients.
            tracing::error!(error = %inner, "store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    }
}

impl From<OrderingError> for ApiError {
    fn from(err: OrderingError) -> Self {
        ApiError::Ordering(err)
    }
}
