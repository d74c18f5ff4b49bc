//! OpenAI-compatible chat-completions client
//!
//! Shared by every provider that speaks the `/chat/completions` dialect:
//! a JSON request with `stream: true|false`, answered either by one JSON body
//! or by an SSE stream of `choices[0].delta.content` chunks ending in `[DONE]`.

pub mod client;
pub mod error;
pub mod protocol;
pub mod session;

pub use client::OpenAiCompatClient;
pub use error::ProviderError;
pub use session::SseStreamSession;
