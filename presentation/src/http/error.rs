//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use relay_application::RunChatError;
use thiserror::Error;
use tracing::warn;

/// Errors a handler reports as a single JSON body `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or invalid request; nothing was sent upstream.
    #[error("{0}")]
    BadRequest(String),

    /// The backend could not be reached or failed to answer.
    #[error("{0}")]
    BadGateway(String),

    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<RunChatError> for ApiError {
    fn from(err: RunChatError) -> Self {
        match err {
            RunChatError::Validation(_) => ApiError::BadRequest(err.to_string()),
            RunChatError::Setup(_) | RunChatError::Upstream(_) => {
                ApiError::BadGateway(err.to_string())
            }
            RunChatError::Cancelled => ApiError::Cancelled,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(%status, "Chat request failed: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
