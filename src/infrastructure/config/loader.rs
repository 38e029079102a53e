use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Default project configuration file.
pub const DEFAULT_CONFIG_PATH: &str = ".notion-sync/config.yaml";

/// Prefix of environment variable overrides, e.g. `NOTION_SYNC_RETRY__MAX_ATTEMPTS`.
pub const ENV_PREFIX: &str = "NOTION_SYNC_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_attempts: {0}. Must be at least 1")]
    InvalidMaxAttempts(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must not exceed max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid requests_per_second: {0}. Must be at least 1")]
    InvalidRateLimit(u32),

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Notion API base URL cannot be empty")]
    EmptyBaseUrl,

    #[error("Mappings path cannot be empty")]
    EmptyMappingsPath,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, text")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `.notion-sync/config.yaml`, or `path` when given
    /// 3. Environment variables (`NOTION_SYNC_*` prefix, `__` separates sections)
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let config: Config = Self::figment(file)
            .extract()
            .context(format!("Failed to load configuration (file: {})", file.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment(file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts(config.retry.max_attempts));
        }

        if config.retry.initial_backoff_ms > config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        if config.notion.requests_per_second == 0 {
            return Err(ConfigError::InvalidRateLimit(config.notion.requests_per_second));
        }

        if config.notion.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.notion.timeout_secs));
        }

        if config.notion.api_base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        if config.storage.mappings_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyMappingsPath);
        }

        validate_log_level(&config.logging.level)?;

        if let Some(format) = &config.logging.format {
            validate_log_format(format)?;
        }

        Ok(())
    }
}

pub fn validate_log_level(level: &str) -> Result<(), ConfigError> {
    let valid_log_levels = [
        "trace", "debug", "info", "warn", "warning", "error", "critical",
    ];
    if valid_log_levels.contains(&level.to_ascii_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ConfigError::InvalidLogLevel(level.to_string()))
    }
}

pub fn validate_log_format(format: &str) -> Result<(), ConfigError> {
    let valid_log_formats = ["json", "text"];
    if valid_log_formats.contains(&format.to_ascii_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ConfigError::InvalidLogFormat(format.to_string()))
    }
}
