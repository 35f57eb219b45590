//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (WEB_SEARCH_*)
//! 2. TOML config file (if WEB_SEARCH_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (WEB_SEARCH_*)
/// 2. TOML config file (if WEB_SEARCH_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tavily API key for outbound searches.
    ///
    /// Set via WEB_SEARCH_API_KEY, falling back to TAVILY_API_KEY.
    /// Required only when a cache miss triggers a remote search.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the search API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path to the SQLite cache database.
    ///
    /// Set via WEB_SEARCH_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Namespace prepended to every storage key.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Record time-to-live in days; 0 disables expiry.
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u32,

    /// Age threshold for the sweep that runs before each CLI search.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://api.tavily.com".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./web-search-cache.sqlite")
}

fn default_prefix() -> String {
    "web-search:".into()
}

fn default_ttl_days() -> u32 {
    14
}

fn default_retention_days() -> u32 {
    14
}

fn default_user_agent() -> String {
    "search-cache/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            db_path: default_db_path(),
            prefix: default_prefix(),
            ttl_days: default_ttl_days(),
            retention_days: default_retention_days(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration file cannot be read,
    /// environment variables cannot be parsed, or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("WEB_SEARCH_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("WEB_SEARCH_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let mut config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("TAVILY_API_KEY").ok();
        }

        config.validate()?;

        Ok(config)
    }

    /// Check if the search API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the API key is not set.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "api_key".into(),
                hint: "Set WEB_SEARCH_API_KEY or TAVILY_API_KEY".into(),
            })
    }
}
