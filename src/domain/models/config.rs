use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure for notion-sync
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Notion API connection settings
    #[serde(default)]
    pub notion: NotionConfig,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Mapping store configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Notion API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NotionConfig {
    /// Base URL of the Notion API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Value of the `Notion-Version` header
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-request transport deadline in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Client-side request rate limit
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

fn default_api_base_url() -> String {
    "https://api.notion.com".to_string()
}

fn default_api_version() -> String {
    "2022-06-28".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_requests_per_second() -> u32 {
    3
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of attempts per remote call (including the first)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    1_000
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Mapping store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StorageConfig {
    /// Path of the JSON mappings file
    #[serde(default = "default_mappings_path")]
    pub mappings_path: PathBuf,
}

fn default_mappings_path() -> PathBuf {
    PathBuf::from("build/notion_mappings.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mappings_path: default_mappings_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or text. Unset means the command's default.
    #[serde(default)]
    pub format: Option<String>,

    /// Directory for an additional JSON log file
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
            log_dir: None,
        }
    }
}
