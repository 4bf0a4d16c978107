use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

/// Client settings persisted under the user's config directory.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Base URL of the FarmChainX server.
    pub api_url: String,
    /// Bearer token saved after a successful remote sign-in.
    pub token: Option<String>,
    /// Overrides the default store file location.
    pub store_path: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            store_path: None,
        }
    }
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Malformed config at {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, raw).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Resolved store file path: the configured override or the default
    /// under the user's data directory.
    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }
        Ok(data_dir()?.join("store.json"))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not determine the user config directory")?;
    Ok(dir.join("farmchainx").join("config.toml"))
}

fn data_dir() -> Result<PathBuf> {
    let dir = dirs::data_dir().context("Could not determine the user data directory")?;
    Ok(dir.join("farmchainx"))
}
