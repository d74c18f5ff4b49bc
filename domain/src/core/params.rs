//! Generation parameters forwarded to the backend untouched.

use serde::{Deserialize, Serialize};

/// Optional sampling knobs supplied by the caller.
///
/// The relay core never interprets these; providers map them onto their
/// own request schema and omit anything left as `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl GenerationParams {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_are_omitted() {
        let json = serde_json::to_value(GenerationParams::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn builder_sets_fields() {
        let params = GenerationParams::default()
            .with_temperature(0.2)
            .with_max_tokens(256);
        assert_eq!(params.temperature, Some(0.2));
        assert_eq!(params.max_tokens, Some(256));
    }
}
