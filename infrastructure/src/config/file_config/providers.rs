//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which backend serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Volcengine Ark
    #[default]
    Ark,
    /// Any OpenAI-compatible endpoint (SiliconFlow, OpenAI, ...)
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Ark => "ark",
            ProviderKind::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ark" => Ok(ProviderKind::Ark),
            "openai" => Ok(ProviderKind::OpenAi),
            other => Err(format!("unknown provider '{}' (expected ark or openai)", other)),
        }
    }
}

/// Volcengine Ark configuration (`[providers.ark]`, `ARK_*`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileArkConfig {
    /// API key (`ARK_API_KEY`). Required when Ark is the active provider.
    pub api_key: Option<String>,
    /// Model or endpoint id (`ARK_MODEL_ID`).
    pub model: String,
    /// Explicit base URL (`ARK_BASE_URL`); derived from `region` when unset.
    pub base_url: Option<String>,
    /// Region (`ARK_REGION`, default: "cn-beijing").
    pub region: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FileArkConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "doubao-seed-1-6-251015".to_string(),
            base_url: None,
            region: "cn-beijing".to_string(),
            timeout_secs: 60,
        }
    }
}

impl FileArkConfig {
    /// Base URL of the chat-completions API.
    pub fn endpoint(&self) -> String {
        match &self.base_url {
            Some(url) if !url.trim().is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("https://ark.{}.volces.com/api/v3", self.region),
        }
    }
}

/// OpenAI-compatible provider configuration (`[providers.openai]`, `SF_*`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// API key (`SF_API_KEY`).
    pub api_key: Option<String>,
    /// Model id (`SF_MODEL_ID`). No default; the endpoint decides what exists.
    pub model: Option<String>,
    /// Base URL including the version prefix (`SF_BASE_URL`).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Active provider: "ark" or "openai".
    pub default: ProviderKind,
    /// Ark settings.
    pub ark: FileArkConfig,
    /// OpenAI-compatible settings.
    pub openai: FileOpenAiConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ark_endpoint_derived_from_region() {
        let mut ark = FileArkConfig::default();
        assert_eq!(ark.endpoint(), "https://ark.cn-beijing.volces.com/api/v3");

        ark.region = "ap-southeast".to_string();
        assert_eq!(ark.endpoint(), "https://ark.ap-southeast.volces.com/api/v3");

        ark.base_url = Some("http://localhost:9000/v3/".to_string());
        assert_eq!(ark.endpoint(), "http://localhost:9000/v3");
    }

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("ark".parse::<ProviderKind>(), Ok(ProviderKind::Ark));
        assert_eq!("OpenAI".parse::<ProviderKind>(), Ok(ProviderKind::OpenAi));
        assert!("bedrock".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_deserialize_providers_section() {
        let toml_str = r#"
default = "openai"

[ark]
region = "cn-shanghai"

[openai]
base_url = "https://api.siliconflow.cn/v1"
model = "Qwen/Qwen2.5-7B-Instruct"
"#;
        let config: FileProvidersConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default, ProviderKind::OpenAi);
        assert_eq!(config.ark.region, "cn-shanghai");
        assert_eq!(config.ark.model, "doubao-seed-1-6-251015");
        assert_eq!(config.openai.model.as_deref(), Some("Qwen/Qwen2.5-7B-Instruct"));
        assert_eq!(config.openai.timeout_secs, 60);
    }
}
