//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tokio::task::JoinError;

/// Server error type for the JSON API.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// No document at the requested path, or the path is not allowed.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Rendering task failed unexpectedly.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JoinError> for ServerError {
    fn from(e: JoinError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::PageNotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Page not found", "path": path}),
            ),
            Self::Internal(message) => {
                tracing::error!(error = %message, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Internal server error"}),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
