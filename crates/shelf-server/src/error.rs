//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::storage::StoreError;

/// Request-level error taxonomy. Every failure maps onto exactly one of
/// these and renders as `{"error": <message>}`; nothing is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body or malformed id in the path.
    #[error("{0}")]
    BadRequest(String),

    #[error("Book not found")]
    NotFound,

    /// Any storage or cache client failure.
    #[error("{0}")]
    Backend(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Backend(e) => ApiError::Backend(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Backend(e) => {
                tracing::error!("backend failure: {:#}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_maps_to_api_not_found() {
        let err = ApiError::from(StoreError::NotFound);
        assert!(matches!(err, ApiError::NotFound));
        assert_eq!(err.to_string(), "Book not found");
    }

    #[test]
    fn backend_errors_keep_their_message() {
        let err = ApiError::from(StoreError::Backend(anyhow::anyhow!("redis SET failed")));
        assert_eq!(err.to_string(), "redis SET failed");
    }
}
