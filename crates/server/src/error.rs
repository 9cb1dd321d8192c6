//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//!
//! Every error response has the JSON shape `{"error": "...", "details": "..."}`
//! where `details` is only present for client errors.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading or writing the key-value store failed.
    #[error("Failed to {action}: {source}")]
    Store {
        /// What the handler was doing, e.g. "fetch products".
        action: &'static str,
        #[source]
        source: StoreError,
    },

    /// Request body could not be used.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body exceeds the configured limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Missing or wrong bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// No route matched.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Wrap a store failure with the action that triggered it.
    #[must_use]
    pub const fn store(action: &'static str, source: StoreError) -> Self {
        Self::Store { action, source }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(rejection.body_text())
        } else {
            Self::BadRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Store { .. }) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose storage details to clients
        let body = match &self {
            Self::Store { action, .. } => json!({ "error": format!("Failed to {action}") }),
            Self::BadRequest(details) => json!({ "error": "Bad request", "details": details }),
            Self::PayloadTooLarge(details) => {
                json!({ "error": "Payload too large", "details": details })
            }
            Self::Unauthorized => json!({ "error": "Unauthorized" }),
            Self::NotFound(path) => json!({ "error": "Not found", "details": path }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::store(
            "fetch products",
            StoreError::DataCorruption("not an array".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Failed to fetch products: data corruption: not an array"
        );

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[tokio::test]
    async fn test_store_error_hides_details() {
        let err = AppError::store(
            "add product",
            StoreError::DataCorruption("products_mario holds an object".to_string()),
        );

        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to add product");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_client_error_status_codes() {
        let (status, body) = body_json(AppError::BadRequest("missing field".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], "missing field");

        let (status, body) = body_json(AppError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");

        let (status, body) =
            body_json(AppError::PayloadTooLarge("length limit exceeded".to_string())).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "Payload too large");

        let (status, _) = body_json(AppError::NotFound("/nope".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
