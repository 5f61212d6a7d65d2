//! Client configuration management.
//!
//! This module handles loading and saving the client configuration: the API
//! base URL plus the two endpoint paths the server deployment may relocate.
//! It also derives the on-disk location of the session store, which is
//! scoped by server origin so two deployments never see each other's
//! cached identity.
//!
//! Configuration is stored at `~/.config/loginkit/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "loginkit";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default base URL for the authentication API
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v1/auth";

/// Default path (under the base URL) of the profile-update endpoint
const DEFAULT_PROFILE_PATH: &str = "profile";

/// Default path (under the base URL) of the password-change endpoint
const DEFAULT_PASSWORD_PATH: &str = "password";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    pub profile_path: String,
    pub password_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile_path: DEFAULT_PROFILE_PATH.to_string(),
            password_path: DEFAULT_PASSWORD_PATH.to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the cached session for this server origin.
    pub fn session_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join(origin_key(&self.base_url)))
    }
}

/// Flatten a base URL into a directory-name-safe origin key.
fn origin_key(url: &str) -> String {
    url.trim_end_matches('/')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
