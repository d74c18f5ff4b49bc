//! Conversation vocabulary shared by templates, models and the relay.
//!
//! - [`entities::Message`]: a role-tagged unit of conversation text
//! - [`stream::MessageFragment`]: one increment of an in-progress answer

pub mod entities;
pub mod stream;
