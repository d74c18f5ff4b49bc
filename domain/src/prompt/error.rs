//! Prompt template errors

use thiserror::Error;

/// Errors raised while formatting a [`PromptTemplate`](super::PromptTemplate)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("missing template variable: {0}")]
    MissingVariable(String),

    #[error("missing conversation history: {0}")]
    MissingHistory(String),

    #[error("template variable '{name}' must be {expected}")]
    VariableTypeMismatch { name: String, expected: &'static str },

    #[error("template syntax error at byte {position}: {reason}")]
    Syntax {
        position: usize,
        reason: &'static str,
    },
}
