//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CLEANPAGE_*)
//! 2. TOML config file (if CLEANPAGE_CONFIG_FILE set)
//! 3. Built-in defaults

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
/// 1. Environment variables (CLEANPAGE_*)
/// 2. TOML config file (if CLEANPAGE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Storage API endpoint, e.g. `https://cloud.appwrite.io/v1`.
    ///
    /// Set via CLEANPAGE_ENDPOINT environment variable.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Storage project identifier.
    ///
    /// Set via CLEANPAGE_PROJECT_ID environment variable.
    #[serde(default)]
    pub project_id: Option<String>,

    /// Container used when a load names none.
    ///
    /// Set via CLEANPAGE_DEFAULT_CONTAINER_ID environment variable.
    #[serde(default)]
    pub default_container_id: Option<String>,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via CLEANPAGE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per item.
    ///
    /// Set via CLEANPAGE_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP transport timeout in milliseconds.
    ///
    /// Set via CLEANPAGE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Whether loads sanitize large items in chunks by default.
    ///
    /// Set via CLEANPAGE_PROGRESSIVE environment variable.
    #[serde(default)]
    pub progressive: bool,

    /// Characters sanitized before the first yield in progressive mode.
    ///
    /// Set via CLEANPAGE_INITIAL_CHUNK_CHARS environment variable.
    #[serde(default = "default_initial_chunk_chars")]
    pub initial_chunk_chars: usize,

    /// Characters sanitized per later step in progressive mode.
    ///
    /// Set via CLEANPAGE_CHUNK_CHARS environment variable.
    #[serde(default = "default_chunk_chars")]
    pub chunk_chars: usize,

    /// Age after which a cached result is refetched.
    ///
    /// Set via CLEANPAGE_MAX_CACHE_AGE_MS environment variable.
    #[serde(default = "default_max_cache_age_ms")]
    pub max_cache_age_ms: u64,
}

fn default_user_agent() -> String {
    "cleanpage/0.1".into()
}

fn default_max_bytes() -> usize {
    10_485_760 // 10MB
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_initial_chunk_chars() -> usize {
    50_000
}

fn default_chunk_chars() -> usize {
    25_000
}

fn default_max_cache_age_ms() -> u64 {
    1_800_000 // 30 min
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            project_id: None,
            default_container_id: None,
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            progressive: false,
            initial_chunk_chars: default_initial_chunk_chars(),
            chunk_chars: default_chunk_chars(),
            max_cache_age_ms: default_max_cache_age_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache age limit as Duration.
    pub fn max_cache_age(&self) -> Duration {
        Duration::from_millis(self.max_cache_age_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `CLEANPAGE_`
    /// 2. TOML file from `CLEANPAGE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CLEANPAGE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("CLEANPAGE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Storage endpoint, required before any item can be resolved.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the endpoint is not set.
    pub fn require_endpoint(&self) -> Result<&str, ConfigError> {
        self.endpoint.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "endpoint".into(),
            hint: "Set CLEANPAGE_ENDPOINT environment variable".into(),
        })
    }

    /// Storage project id, required before any item can be resolved.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the project id is not set.
    pub fn require_project_id(&self) -> Result<&str, ConfigError> {
        self.project_id.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "project_id".into(),
            hint: "Set CLEANPAGE_PROJECT_ID environment variable".into(),
        })
    }

    /// Optional keys that are unset; loads still work but callers must name
    /// a container explicitly.
    pub fn missing_optional(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.default_container_id.is_none() {
            missing.push("default_container_id");
        }
        missing
    }
}
