//! Configuration loading for chat-relay
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `RELAY_*` (nested with `__`), `ARK_*`, `SF_*`
//! 2. `--config <path>` specified file
//! 3. Project root: `./chat-relay.toml` or `./.chat-relay.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/chat-relay/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileArkConfig, FileConfig, FileLoggingConfig, FileOpenAiConfig,
    FileProvidersConfig, FileServerConfig, ProviderKind,
};
pub use loader::ConfigLoader;
