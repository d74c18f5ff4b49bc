//! Role-tagged prompt templates with an inlined history placeholder.

use super::error::TemplateError;
use super::placeholder::{Piece, scan};
use super::variables::{TemplateValue, TemplateVariables};
use crate::session::entities::{Message, Role};

/// One declared part of a [`PromptTemplate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A single message whose text may reference `{name}` placeholders.
    Fixed { role: Role, template: String },
    /// Zero or more prior messages supplied under `variable` at format time.
    History { variable: String, optional: bool },
}

impl Segment {
    pub fn system(template: impl Into<String>) -> Self {
        Segment::Fixed {
            role: Role::System,
            template: template.into(),
        }
    }

    pub fn user(template: impl Into<String>) -> Self {
        Segment::Fixed {
            role: Role::User,
            template: template.into(),
        }
    }

    pub fn history(variable: impl Into<String>, optional: bool) -> Self {
        Segment::History {
            variable: variable.into(),
            optional,
        }
    }
}

/// An ordered list of segments that formats into a message list.
///
/// Formatting is pure: the same template and variables always produce the
/// same messages, and any error aborts the whole format without returning
/// a partial list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Append a segment (builder style).
    pub fn with(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Check every fixed segment for syntax errors without formatting.
    pub fn validate(&self) -> Result<(), TemplateError> {
        for segment in &self.segments {
            if let Segment::Fixed { template, .. } = segment {
                scan(template)?;
            }
        }
        Ok(())
    }

    /// Distinct placeholder names across fixed segments, in first-use order.
    pub fn placeholders(&self) -> Result<Vec<String>, TemplateError> {
        let mut names: Vec<String> = Vec::new();
        for segment in &self.segments {
            if let Segment::Fixed { template, .. } = segment {
                for piece in scan(template)? {
                    if let Piece::Placeholder(name) = piece
                        && !names.iter().any(|n| n == name)
                    {
                        names.push(name.to_string());
                    }
                }
            }
        }
        Ok(names)
    }

    /// Build the message list for `variables`.
    pub fn format(&self, variables: &TemplateVariables) -> Result<Vec<Message>, TemplateError> {
        let mut messages = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            match segment {
                Segment::Fixed { role, template } => {
                    let content = render(template, variables)?;
                    messages.push(Message::new(*role, content));
                }
                Segment::History { variable, optional } => match variables.get(variable) {
                    Some(TemplateValue::Messages(history)) => {
                        messages.extend(history.iter().cloned());
                    }
                    Some(TemplateValue::Text(_)) => {
                        return Err(TemplateError::VariableTypeMismatch {
                            name: variable.clone(),
                            expected: "a message list",
                        });
                    }
                    None if *optional => {}
                    None => return Err(TemplateError::MissingHistory(variable.clone())),
                },
            }
        }

        Ok(messages)
    }
}

fn render(template: &str, variables: &TemplateVariables) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    for piece in scan(template)? {
        match piece {
            Piece::Literal(s) => out.push_str(s),
            Piece::Brace(c) => out.push(c),
            Piece::Placeholder(name) => match variables.get(name) {
                Some(TemplateValue::Text(value)) => out.push_str(value),
                Some(TemplateValue::Messages(_)) => {
                    return Err(TemplateError::VariableTypeMismatch {
                        name: name.to_string(),
                        expected: "text",
                    });
                }
                None => return Err(TemplateError::MissingVariable(name.to_string())),
            },
        }
    }
    Ok(out)
}
