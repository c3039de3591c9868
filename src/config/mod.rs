//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::fetch::ClientConfig;
use crate::sync::LocatorConfig;

/// Largest page the search endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Provider API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the replay API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Playlist filter for searches
    #[serde(default = "default_playlist")]
    pub playlist: String,

    /// Replays requested per search page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Concurrent detail fetches for elevated tiers
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_base_url() -> String {
    "https://ballchasing.com/api".to_string()
}

fn default_api_key_env() -> String {
    "BALLCHASING_API_KEY".to_string()
}

fn default_playlist() -> String {
    "ranked-doubles".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_timeout() -> u64 {
    30
}

fn default_workers() -> usize {
    4
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            playlist: default_playlist(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout(),
            workers: default_workers(),
        }
    }
}

impl ApiConfig {
    /// HTTP client settings derived from this section.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
            ..Default::default()
        }
    }

    /// Search settings derived from this section.
    pub fn locator_config(&self, keep_raw: bool) -> LocatorConfig {
        LocatorConfig {
            playlist: self.playlist.clone(),
            page_size: self.page_size,
            keep_raw,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root under which run directories are created
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub api: ApiConfig,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            log_level: default_log_level(),
            api: ApiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "API base URL must not be empty".to_string(),
            ));
        }

        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        if self.api.page_size == 0 || self.api.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "Page size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        if self.api.workers == 0 {
            return Err(ConfigError::ValidationError(
                "Worker count must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
