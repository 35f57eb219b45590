//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Longest accepted record TTL (ten years).
const MAX_TTL_DAYS: u32 = 3650;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `prefix` is empty or does not end with `:`
    /// - `ttl_days` or `retention_days` exceeds ten years
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or `base_url` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.is_empty() {
            return Err(ConfigError::Invalid { field: "prefix".into(), reason: "must not be empty".into() });
        }
        if !self.prefix.ends_with(':') {
            return Err(ConfigError::Invalid { field: "prefix".into(), reason: "must end with ':'".into() });
        }

        if self.ttl_days > MAX_TTL_DAYS {
            return Err(ConfigError::Invalid {
                field: "ttl_days".into(),
                reason: format!("must not exceed {MAX_TTL_DAYS}"),
            });
        }
        if self.retention_days > MAX_TTL_DAYS {
            return Err(ConfigError::Invalid {
                field: "retention_days".into(),
                reason: format!("must not exceed {MAX_TTL_DAYS}"),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }
        if self.base_url.is_empty() {
            return Err(ConfigError::Invalid { field: "base_url".into(), reason: "must not be empty".into() });
        }

        if self.ttl_days > 0 && self.retention_days > self.ttl_days {
            tracing::warn!(
                ttl_days = self.ttl_days,
                retention_days = self.retention_days,
                "retention_days exceeds ttl_days; records expire before the sweep reaches them"
            );
        }

        Ok(())
    }
}
