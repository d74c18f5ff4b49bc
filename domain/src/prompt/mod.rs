//! Prompt domain
//!
//! Turns a [`PromptTemplate`] plus [`TemplateVariables`] into an ordered
//! list of [`Message`](crate::session::entities::Message)s.

mod error;
mod placeholder;
mod presets;
mod template;
mod variables;

pub use error::TemplateError;
pub use presets::CHAT_HISTORY;
pub use template::{PromptTemplate, Segment};
pub use variables::{TemplateValue, TemplateVariables};
