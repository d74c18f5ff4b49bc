//! Variable map supplied to a template at format time.

use crate::session::entities::Message;
use std::collections::HashMap;

/// A value bound to a template variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    /// Substituted into `{name}` placeholders.
    Text(String),
    /// Spliced in place of a history segment.
    Messages(Vec<Message>),
}

impl From<String> for TemplateValue {
    fn from(s: String) -> Self {
        TemplateValue::Text(s)
    }
}

impl From<&str> for TemplateValue {
    fn from(s: &str) -> Self {
        TemplateValue::Text(s.to_string())
    }
}

impl From<Vec<Message>> for TemplateValue {
    fn from(messages: Vec<Message>) -> Self {
        TemplateValue::Messages(messages)
    }
}

/// Mapping from variable name to [`TemplateValue`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVariables {
    values: HashMap<String, TemplateValue>,
}

impl TemplateVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a text variable (builder style).
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, TemplateValue::Text(value.into()));
        self
    }

    /// Bind a message-list variable (builder style).
    pub fn messages(mut self, name: impl Into<String>, messages: Vec<Message>) -> Self {
        self.insert(name, TemplateValue::Messages(messages));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<TemplateValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&TemplateValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
