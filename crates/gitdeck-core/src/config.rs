//! Configuration management for gitdeck.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// gitdeck configuration loaded from `.gitdeck.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Commit defaults.
    #[serde(default)]
    pub commit: CommitConfig,

    /// History paging.
    #[serde(default)]
    pub history: HistoryConfig,
}

impl Config {
    /// Default config file name, looked up in the current directory.
    pub const FILE_NAME: &'static str = ".gitdeck.toml";

    /// Load config from a TOML file.
    ///
    /// # Errors
    /// Returns error if file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a TOML file.
    ///
    /// # Errors
    /// Returns error if serialization or write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| std::io::Error::other(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Where the Git service lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Backend base URL.
    #[serde(default = "default_url")]
    pub url: String,

    /// Workspace key on the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,

    /// Environment variable holding the bearer token, if the backend needs one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            workspace: None,
            token_env: None,
        }
    }
}

fn default_url() -> String {
    "http://localhost:8080".into()
}

/// Commit defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitConfig {
    /// Message used when the commit draft is empty.
    #[serde(default = "default_commit_message")]
    pub default_message: String,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            default_message: default_commit_message(),
        }
    }
}

fn default_commit_message() -> String {
    "Update files".into()
}

/// History paging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Commits per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

const fn default_page_size() -> u32 {
    30
}
