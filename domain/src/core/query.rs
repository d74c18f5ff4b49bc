//! Query value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// The primary text of a chat request (Value Object)
///
/// Always non-empty after trimming. The original text is kept verbatim,
/// surrounding whitespace included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query {
    content: String,
}

impl Query {
    /// Validate and wrap the query text
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            Err(DomainError::EmptyQuery)
        } else {
            Ok(Self { content })
        }
    }

    /// Get the query content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Query {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Query::try_new(s)
    }
}

impl From<Query> for String {
    fn from(q: Query) -> Self {
        q.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_creation() {
        let q = Query::try_new("What is Rust?").unwrap();
        assert_eq!(q.content(), "What is Rust?");
    }

    #[test]
    fn test_try_new_empty() {
        assert_eq!(Query::try_new(""), Err(DomainError::EmptyQuery));
        assert_eq!(Query::try_new("  \n\t "), Err(DomainError::EmptyQuery));
    }

    #[test]
    fn test_whitespace_is_preserved() {
        let q = Query::try_new("  hi  ").unwrap();
        assert_eq!(q.content(), "  hi  ");
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let ok: Result<Query, _> = serde_json::from_str("\"hello\"");
        assert!(ok.is_ok());
        let err: Result<Query, _> = serde_json::from_str("\"   \"");
        assert!(err.is_err());
    }
}
