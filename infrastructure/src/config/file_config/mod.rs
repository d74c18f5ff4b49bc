//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Environment variables are mapped onto the same structure by the loader.

mod logging;
mod providers;
mod server;

pub use logging::FileLoggingConfig;
pub use providers::{FileArkConfig, FileOpenAiConfig, FileProvidersConfig, ProviderKind};
pub use server::FileServerConfig;

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{provider}: timeout_secs cannot be 0")]
    InvalidTimeout { provider: &'static str },

    #[error("{provider}: model name cannot be empty")]
    EmptyModelName { provider: &'static str },

    #[error("server.listen is not a socket address: {0}")]
    InvalidListenAddress(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP server settings
    pub server: FileServerConfig,
    /// Backend selection and credentials
    pub providers: FileProvidersConfig,
    /// Conversation log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Check values serde cannot reject on its own.
    ///
    /// Credentials are not checked here; a missing key is reported when the
    /// provider is built, so `--help`-style paths never need one.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.listen.parse::<SocketAddr>().is_err() {
            return Err(ConfigValidationError::InvalidListenAddress(
                self.server.listen.clone(),
            ));
        }

        let ark = &self.providers.ark;
        if ark.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout { provider: "ark" });
        }
        if ark.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName { provider: "ark" });
        }

        let openai = &self.providers.openai;
        if openai.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout { provider: "openai" });
        }
        if openai.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyModelName { provider: "openai" });
        }

        Ok(())
    }
}
