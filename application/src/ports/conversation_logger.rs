//! Port for structured conversation logging.
//!
//! Records request and relay outcomes (`chat_request`, `generate_response`,
//! `stream_outcome`, `prompt_formatted`) to a machine-readable log, separate
//! from `tracing` diagnostics.

use serde_json::Value;

/// A structured conversation event.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "chat_request", "stream_outcome").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for [`ConversationEvent`]s.
///
/// `log` is synchronous and infallible; implementations swallow their own
/// I/O failures so logging never affects a request.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Logger that drops every event.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
