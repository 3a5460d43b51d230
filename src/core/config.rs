//! Configuration management

use crate::core::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub api: ApiConfig,
    pub github: GitHubConfig,
    pub cache: CacheConfig,
    pub web: WebConfig,
}

/// Where directory listings come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The remote listing API (`POST /api/repository-tree`)
    #[default]
    Api,
    /// The GitHub contents API directly
    Github,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default listing source for the CLI
    pub source: SourceKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the listing API
    pub base_url: String,
    /// Request timeout (seconds)
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub REST API root
    pub api_url: String,
    /// User-Agent sent with every request (GitHub rejects requests without one)
    pub user_agent: String,
    /// Request timeout (seconds)
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache successful listings
    pub enabled: bool,
    /// Listing TTL (seconds)
    pub ttl_secs: u64,
    /// Maximum cached listings
    pub max_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Port for `gitgutter serve`
    pub port: u16,
    /// Open explorer sessions kept before the least recently used is dropped
    pub max_sessions: usize,
    /// Idle time after which a session is dropped (seconds)
    pub session_ttl_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: format!("http://127.0.0.1:{}", DEFAULT_WEB_PORT),
            timeout_secs: 30,
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            user_agent: format!("gitgutter/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 60,
            max_entries: 512,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_WEB_PORT,
            max_sessions: 256,
            session_ttl_secs: 30 * 60,
        }
    }
}

impl Config {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit file, falling back to defaults if absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::gitgutter_home()?.join("config.toml"))
    }

    /// Get the gitgutter home directory
    pub fn gitgutter_home() -> Result<PathBuf> {
        if let Ok(home) = std::env::var("GITGUTTER_HOME") {
            return Ok(PathBuf::from(home));
        }

        ProjectDirs::from("dev", "gitgutter", "gitgutter")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| Error::ConfigError {
                message: "Could not determine gitgutter home directory".to_string(),
            })
    }
}

/// Default port shared by the listing API and `gitgutter serve`
pub const DEFAULT_WEB_PORT: u16 = 5001;
