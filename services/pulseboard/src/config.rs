//! Configuration types for the pulseboard client

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Where the backend API and the live feed are served
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            ws_url: default_ws_url(),
        }
    }
}

/// Token persistence settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Token file; defaults to `<config dir>/pulseboard/token`
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

impl SessionConfig {
    /// Resolved token file path
    pub fn token_path(&self) -> crate::Result<PathBuf> {
        if let Some(path) = &self.token_file {
            return Ok(path.clone());
        }
        dirs::config_dir()
            .map(|dir| {
                dir.join("pulseboard")
                    .join(pulseboard_core::session::TOKEN_KEY)
            })
            .ok_or_else(|| {
                crate::PulseboardError::Config(
                    "No user config directory; set session.token_file".to_string(),
                )
            })
    }
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_ws_url() -> String {
    "ws://localhost:8000".to_string()
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::PulseboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
