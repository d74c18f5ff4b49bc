//! Streaming increments of an assistant answer.

use serde::{Deserialize, Serialize};

/// One incremental piece of an in-progress assistant message.
///
/// Fragments carry no role; they always belong to the assistant. Joining the
/// contents of every fragment in emission order yields the full answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFragment {
    pub content: String,
}

impl MessageFragment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
