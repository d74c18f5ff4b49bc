//! Configuration loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use tracing::warn;

const PROJECT_FILES: [&str; 2] = ["chat-relay.toml", ".chat-relay.toml"];

/// `ARK_*` variables recognised on top of the config file.
const ARK_KEYS: [&str; 5] = ["api_key", "model_id", "base_url", "region", "timeout_secs"];

/// `SF_*` variables recognised on top of the config file.
const SF_KEYS: [&str; 4] = ["api_key", "model_id", "base_url", "timeout_secs"];

/// Ark request-signing credentials; only bearer API keys are used.
const UNSUPPORTED_ENV: [&str; 2] = ["ARK_ACCESS_KEY", "ARK_SECRET_KEY"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment (`RELAY_*`, `ARK_*`, `SF_*`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./chat-relay.toml` or `./.chat-relay.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/chat-relay/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        Self::with_env(figment).extract().map_err(Box::new)
    }

    /// Defaults plus environment, ignoring every file (for `--no-config`)
    pub fn load_without_files() -> Result<FileConfig, Box<figment::Error>> {
        Self::with_env(Figment::new().merge(Serialized::defaults(FileConfig::default())))
            .extract()
            .map_err(Box::new)
    }

    fn with_env(figment: Figment) -> Figment {
        for name in Self::unsupported_env() {
            warn!("{} is set but ignored: Ark is called with ARK_API_KEY only", name);
        }

        figment
            .merge(Self::provider_env("ARK_", "ark", &ARK_KEYS))
            .merge(Self::provider_env("SF_", "openai", &SF_KEYS))
            .merge(Env::prefixed("RELAY_").split("__"))
    }

    /// Map `{prefix}{KEY}` onto `providers.{section}.{key}`; `MODEL_ID` lands on `model`.
    fn provider_env(prefix: &str, section: &'static str, keys: &'static [&'static str]) -> Env {
        Env::prefixed(prefix)
            .filter(move |key| keys.iter().any(|k| key.as_str().eq_ignore_ascii_case(k)))
            .map(move |key| {
                let key = key.as_str().to_ascii_lowercase();
                let field = if key == "model_id" { "model" } else { key.as_str() };
                format!("providers.{}.{}", section, field).into()
            })
    }

    /// Variables that are set in the environment but have no effect.
    pub fn unsupported_env() -> Vec<&'static str> {
        UNSUPPORTED_ENV
            .into_iter()
            .filter(|name| std::env::var_os(name).is_some_and(|v| !v.is_empty()))
            .collect()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("chat-relay").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;
    use figment::Jail;

    #[test]
    fn test_defaults_without_sources() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::load_without_files().map_err(|e| *e)?;
            assert_eq!(config, FileConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("chat-relay"));
    }

    #[test]
    fn test_project_file_is_picked_up() {
        Jail::expect_with(|jail| {
            jail.create_file(
                ".chat-relay.toml",
                r#"
                [server]
                listen = "127.0.0.1:3000"

                [providers.ark]
                region = "cn-shanghai"
                "#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.server.listen, "127.0.0.1:3000");
            assert_eq!(
                config.providers.ark.endpoint(),
                "https://ark.cn-shanghai.volces.com/api/v3"
            );
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file("chat-relay.toml", "[server]\nlisten = \"127.0.0.1:3000\"\n")?;
            jail.create_file("custom.toml", "[server]\nlisten = \"127.0.0.1:4000\"\n")?;

            let config = ConfigLoader::load(Some(Path::new("custom.toml"))).map_err(|e| *e)?;
            assert_eq!(config.server.listen, "127.0.0.1:4000");
            Ok(())
        });
    }

    #[test]
    fn test_ark_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("chat-relay.toml", "[providers.ark]\nmodel = \"from-file\"\n")?;
            jail.set_env("ARK_API_KEY", "ark-secret");
            jail.set_env("ARK_MODEL_ID", "from-env");
            jail.set_env("ARK_TIMEOUT_SECS", "15");
            // Not a recognised key; must not leak into the config
            jail.set_env("ARK_SECRET_KEY", "ignored");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            let ark = &config.providers.ark;
            assert_eq!(ark.api_key.as_deref(), Some("ark-secret"));
            assert_eq!(ark.model, "from-env");
            assert_eq!(ark.timeout_secs, 15);
            Ok(())
        });
    }

    #[test]
    fn test_signing_credentials_are_reported_as_unsupported() {
        Jail::expect_with(|jail| {
            jail.set_env("ARK_ACCESS_KEY", "ak");
            jail.set_env("ARK_SECRET_KEY", "sk");

            assert_eq!(
                ConfigLoader::unsupported_env(),
                vec!["ARK_ACCESS_KEY", "ARK_SECRET_KEY"]
            );
            // Still loads; the variables are only reported
            ConfigLoader::load_without_files().map_err(|e| *e)?;
            Ok(())
        });
    }

    #[test]
    fn test_siliconflow_env_maps_to_openai_section() {
        Jail::expect_with(|jail| {
            jail.set_env("SF_API_KEY", "sf-secret");
            jail.set_env("SF_BASE_URL", "https://api.siliconflow.cn/v1");
            jail.set_env("SF_MODEL_ID", "Qwen/Qwen2.5-7B-Instruct");
            jail.set_env("RELAY_PROVIDERS__DEFAULT", "openai");

            let config = ConfigLoader::load_without_files().map_err(|e| *e)?;
            assert_eq!(config.providers.default, ProviderKind::OpenAi);
            let openai = &config.providers.openai;
            assert_eq!(openai.api_key.as_deref(), Some("sf-secret"));
            assert_eq!(openai.base_url, "https://api.siliconflow.cn/v1");
            assert_eq!(openai.model.as_deref(), Some("Qwen/Qwen2.5-7B-Instruct"));
            Ok(())
        });
    }

    #[test]
    fn test_relay_env_nested_keys() {
        Jail::expect_with(|jail| {
            jail.set_env("RELAY_SERVER__LISTEN", "0.0.0.0:8080");
            jail.set_env("RELAY_LOGGING__CONVERSATION_LOG", "logs/relay.jsonl");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.server.listen, "0.0.0.0:8080");
            assert_eq!(
                config.logging.conversation_log,
                Some(PathBuf::from("logs/relay.jsonl"))
            );
            Ok(())
        });
    }
}
