//! Error types for the OpenAI-compatible client

use relay_application::ports::chat_model::GatewayError;
use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur when talking to a chat-completions endpoint
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SSE decoding error: {0}")]
    Sse(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Response contained no choices")]
    EmptyChoices,

    #[error("Request timeout")]
    Timeout,
}

impl From<ProviderError> for GatewayError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            ProviderError::Http(e) if e.is_connect() => GatewayError::ConnectionError(e.to_string()),
            ProviderError::Http(e) => GatewayError::RequestFailed(e.to_string()),
            ProviderError::Status { status, body } => GatewayError::Status { status, body },
            ProviderError::Json(e) => GatewayError::Protocol(e.to_string()),
            other @ (ProviderError::Sse(_) | ProviderError::EmptyChoices) => {
                GatewayError::Protocol(other.to_string())
            }
            ProviderError::Upstream(msg) => GatewayError::RequestFailed(msg),
            ProviderError::Timeout => GatewayError::Timeout,
        }
    }
}
