use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use quotespace_api::RetryConfig;

/// Env var that overrides `api.ninjas_api_key`, so the key never has to
/// live in the config file
pub const NINJAS_KEY_ENV: &str = "API_NINJAS_KEY";

/// Main configuration structure
///
/// Loaded from the config file, then env vars, then CLI flags on top.
/// Priority: CLI > Env > File > Defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub quotes: QuotesConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    /// Load a specific config file; a missing file means defaults
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save config to disk
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Pick up overrides from the environment
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(NINJAS_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.ninjas_api_key = Some(key.trim().to_string());
            }
        }
    }

    /// Get the config file path
    /// Uses XDG on Linux, Application Support on macOS, AppData on Windows
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("quotespace");

        Ok(config_dir.join("config.toml"))
    }

    /// Where the key-value store lives unless `storage.db_path` says otherwise
    pub fn db_path(&self) -> crate::Result<PathBuf> {
        if let Some(path) = &self.storage.db_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find data directory".into()))?
            .join("quotespace");

        Ok(data_dir.join("quotespace.db"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotesConfig {
    /// Category used when the user hasn't picked one
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Suggestions shown to the user. Any string is accepted as a category.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Tried, in order, when the requested category yields nothing
    #[serde(default = "default_fallback_categories")]
    pub fallback_categories: Vec<String>,
}

fn default_category() -> String {
    "inspirational".to_string()
}

fn default_categories() -> Vec<String> {
    [
        "inspirational",
        "success",
        "happiness",
        "life",
        "love",
        "courage",
        "change",
        "education",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

fn default_fallback_categories() -> Vec<String> {
    vec!["inspirational".to_string()]
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
            categories: default_categories(),
            fallback_categories: default_fallback_categories(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API Ninjas key. Without one only ZenQuotes is used.
    /// Get one at https://api-ninjas.com
    pub ninjas_api_key: Option<String>,

    #[serde(default = "default_ninjas_url")]
    pub ninjas_url: String,

    #[serde(default = "default_zenquotes_url")]
    pub zenquotes_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_ninjas_url() -> String {
    quotespace_api::ninjas::NINJAS_API_BASE.to_string()
}

fn default_zenquotes_url() -> String {
    quotespace_api::zenquotes::ZENQUOTES_TODAY_URL.to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            ninjas_api_key: None,
            ninjas_url: default_ninjas_url(),
            zenquotes_url: default_zenquotes_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Backoff settings for the HTTP clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    #[serde(default = "default_backoff")]
    pub backoff_multiplier: f64,
}

fn default_max_retries() -> u32 {
    RetryConfig::default().max_retries
}

fn default_initial_delay() -> u64 {
    RetryConfig::default().initial_delay_ms
}

fn default_max_delay() -> u64 {
    RetryConfig::default().max_delay_ms
}

fn default_backoff() -> f64 {
    RetryConfig::default().backoff_multiplier
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            backoff_multiplier: default_backoff(),
        }
    }
}

impl RetrySettings {
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            initial_delay_ms: self.initial_delay_ms,
            max_delay_ms: self.max_delay_ms,
            backoff_multiplier: self.backoff_multiplier,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Override the key-value store location
    pub db_path: Option<PathBuf>,
}
