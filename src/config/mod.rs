//! Configuration management module.
//!
//! Supports loading configuration from:
//! - TOML files (config/default.toml, config/{profile}.toml)
//! - Environment variables with `ORDER_IDS__<SECTION>__<KEY>` pattern

mod storage;

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::clock::TimeReference;
use crate::domain::IdentifierConfig;

pub use storage::{FileStorageConfig, StorageBackend, StorageConfig};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Defaults applied to every generation call.
    #[serde(default)]
    pub generator: IdentifierConfig,

    /// Time source configuration.
    #[serde(default)]
    pub clock: ClockConfig,

    /// Sequence store configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. `config/default.toml`
    /// 2. `config/{ORDER_IDS_PROFILE}.toml` (if `ORDER_IDS_PROFILE` is set)
    /// 3. Environment variables with `ORDER_IDS__` prefix
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// Load configuration using `config_dir` instead of `./config`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(config_dir: &Path) -> Result<Self, ConfigError> {
        // Determine profile
        let profile =
            std::env::var("ORDER_IDS_PROFILE").unwrap_or_else(|_| "development".to_string());

        // Build configuration
        let config = Config::builder()
            // Load default configuration
            .add_source(File::from(config_dir.join("default")).required(false))
            // Load profile-specific configuration
            .add_source(File::from(config_dir.join(&profile)).required(false))
            // Override with environment variables
            // ORDER_IDS__GENERATOR__PREFIX=SHP -> generator.prefix = "SHP"
            .add_source(
                Environment::with_prefix("ORDER_IDS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Deserialize and validate
        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        // Generator defaults must resolve on their own
        self.generator
            .resolve(&IdentifierConfig::default())
            .map_err(|e| ConfigError::Message(format!("generator: {e}")))?;

        // Validate storage config
        self.storage.validate()?;

        if !matches!(self.observability.log_format.as_str(), "text" | "json") {
            return Err(ConfigError::Message(format!(
                "observability.log_format must be \"text\" or \"json\", got {:?}",
                self.observability.log_format
            )));
        }

        Ok(())
    }
}

/// Time source configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClockConfig {
    /// Wall clock identifiers are dated with.
    #[serde(default)]
    pub time_reference: TimeReference,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "text" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}
