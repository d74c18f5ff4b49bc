//! Server configuration from TOML (`[server]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Socket address the HTTP server binds to.
    pub listen: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:2345".to_string(),
        }
    }
}
