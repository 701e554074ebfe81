//! Application configuration with layered loading.
//!
//! Configuration is assembled with figment from:
//!
//! 1. Environment variables (AMBLE_*)
//! 2. TOML config file (if AMBLE_CONFIG_FILE set)
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
/// 1. Environment variables (AMBLE_*)
/// 2. TOML config file (if AMBLE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite key-value store.
    ///
    /// Set via AMBLE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Base URL of the project metadata API.
    ///
    /// Set via AMBLE_API_BASE_URL environment variable.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via AMBLE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via AMBLE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Hours a cached metadata entry stays fresh.
    ///
    /// Set via AMBLE_CACHE_TTL_HOURS environment variable.
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Pause after rendering a target from cache.
    #[serde(default = "default_hit_pause_ms")]
    pub hit_pause_ms: u64,

    /// Pause after rendering a target that needed the network.
    #[serde(default = "default_fetch_pause_ms")]
    pub fetch_pause_ms: u64,

    /// Use the subtle tilt variant.
    ///
    /// Set via AMBLE_REDUCED_MOTION environment variable.
    #[serde(default)]
    pub reduced_motion: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./amble-store.sqlite")
}

fn default_api_base_url() -> String {
    "https://api.modrinth.com/v2".into()
}

fn default_user_agent() -> String {
    "amble/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_cache_ttl_hours() -> u64 {
    12
}

fn default_hit_pause_ms() -> u64 {
    60
}

fn default_fetch_pause_ms() -> u64 {
    120
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            api_base_url: default_api_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            cache_ttl_hours: default_cache_ttl_hours(),
            hit_pause_ms: default_hit_pause_ms(),
            fetch_pause_ms: default_fetch_pause_ms(),
            reduced_motion: false,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_hours * 60 * 60)
    }

    pub fn hit_pause(&self) -> Duration {
        Duration::from_millis(self.hit_pause_ms)
    }

    pub fn fetch_pause(&self) -> Duration {
        Duration::from_millis(self.fetch_pause_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("AMBLE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("AMBLE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
