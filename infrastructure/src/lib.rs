//! Infrastructure layer for chat-relay
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileArkConfig, FileConfig, FileLoggingConfig,
    FileOpenAiConfig, FileProvidersConfig, FileServerConfig, ProviderKind,
};
pub use logging::JsonlConversationLogger;
pub use providers::{
    ArkChatModel, OpenAiChatModel, build_chat_model,
    openai_compat::{OpenAiCompatClient, ProviderError, SseStreamSession},
};
