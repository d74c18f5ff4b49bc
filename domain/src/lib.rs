//! Domain layer for chat-relay
//!
//! This crate contains the shared vocabulary and the pure logic of the relay.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Message**: a role-tagged unit of conversation text
//! - **Fragment**: one increment of an assistant answer produced while streaming
//! - **Prompt template**: fixed role-tagged segments plus an optional history
//!   placeholder, formatted against a variable map
//! - **Frame**: one outbound event (`data`, the `[DONE]` sentinel, or `error`)
//! - **Relay state**: `Idle → Streaming → Completed | Failed | Abandoned`

pub mod core;
pub mod prompt;
pub mod relay;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use core::{error::DomainError, params::GenerationParams, query::Query};
pub use prompt::{PromptTemplate, Segment, TemplateError, TemplateValue, TemplateVariables};
pub use relay::{DONE_SENTINEL, Frame, RelayEvent, RelayState};
pub use session::{
    entities::{Message, Role},
    stream::MessageFragment,
};
