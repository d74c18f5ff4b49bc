//! Frame sink port
//!
//! The outbound side of the relay. A sink accepts one [`Frame`] at a time and
//! delivers it on [`flush`](FrameSink::flush); the relay never emits a second
//! frame before flushing the first.

use async_trait::async_trait;
use relay_domain::Frame;
use thiserror::Error;

/// Errors reported by a [`FrameSink`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The remote side is gone; nothing more can be delivered.
    #[error("Sink closed")]
    Closed,
}

/// Destination of relayed frames (an SSE response body, a terminal, ...)
#[async_trait]
pub trait FrameSink: Send {
    /// Stage `frame` for delivery.
    async fn emit(&mut self, frame: Frame) -> Result<(), SinkError>;

    /// Push everything staged so far to the remote side.
    async fn flush(&mut self) -> Result<(), SinkError>;
}
