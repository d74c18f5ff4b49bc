//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod relay_stream;
pub mod run_chat;
pub mod run_prompt;
