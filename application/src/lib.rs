//! Application layer for chat-relay
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    chat_model::{ChatModel, GatewayError, StreamSession},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    frame_sink::{FrameSink, SinkError},
};
pub use use_cases::relay_stream::{RelayOutcome, StreamRelay};
pub use use_cases::run_chat::{ChatInput, ChatReply, ChatRequest, RunChatError, RunChatUseCase};
pub use use_cases::run_prompt::{RunPromptError, RunPromptUseCase};
