//! Presentation layer for chat-relay
//!
//! This crate contains the HTTP/SSE surface, CLI definitions and
//! console output.

pub mod cli;
pub mod http;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{AskArgs, Cli, Command, ProviderChoice, ServeArgs};
pub use http::{ApiError, AppState, router, serve};
pub use output::console::{ConsoleFormatter, ConsoleFrameSink};
