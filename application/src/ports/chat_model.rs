//! Chat model port
//!
//! Defines the generation capability a backend client must provide: a
//! one-shot [`ChatModel::generate`] and a pull-based [`ChatModel::stream`].
//! New providers are added by implementing [`ChatModel`]; nothing in the
//! application layer branches on the concrete provider type.

use async_trait::async_trait;
use relay_domain::{GenerationParams, Message, MessageFragment};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur while talking to a generation backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed upstream payload: {0}")]
    Protocol(String),

    #[error("Timeout")]
    Timeout,

    #[error("Operation cancelled")]
    Cancelled,
}

impl GatewayError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GatewayError::Cancelled)
    }
}

/// A text-generation backend.
///
/// Implementations hold only read-only configuration, so one instance can be
/// shared across concurrent requests behind an `Arc<dyn ChatModel>`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Short provider label used in logs and health output.
    fn provider(&self) -> &str;

    /// Produce the complete answer for `messages`.
    ///
    /// Resolves to [`GatewayError::Cancelled`] if `cancel` fires first.
    async fn generate(
        &self,
        messages: &[Message],
        params: &GenerationParams,
        cancel: &CancellationToken,
    ) -> Result<Message, GatewayError>;

    /// Open a fragment stream for `messages`.
    ///
    /// Returns once the upstream stream is established. Setup failures
    /// (credentials, model id, transport refusal, error status) are returned
    /// here and never through the session.
    async fn stream(
        &self,
        messages: &[Message],
        params: &GenerationParams,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn StreamSession>, GatewayError>;
}

/// A live upstream stream with exactly one consumer.
///
/// The consumer must call [`release`](StreamSession::release) on every exit
/// path: normal end, error, or abandonment.
#[async_trait]
pub trait StreamSession: Send {
    /// Pull the next fragment.
    ///
    /// - `Ok(Some(fragment))`: one more increment of the answer
    /// - `Ok(None)`: normal end of stream
    /// - `Err(_)`: abnormal termination; later calls return `Ok(None)`
    async fn next(&mut self) -> Result<Option<MessageFragment>, GatewayError>;

    /// Close the upstream stream. Safe to call more than once.
    fn release(&mut self);
}
