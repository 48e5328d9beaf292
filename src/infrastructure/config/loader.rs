//! Layered configuration loading: defaults, project file, environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local directory holding config and database.
pub const CONFIG_DIR: &str = ".brokerage";

/// Prefix for environment overrides, e.g. `BROKERAGE_DATABASE__PATH`.
pub const ENV_PREFIX: &str = "BROKERAGE_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["json", "pretty"];
const ROTATIONS: [&str; 3] = ["daily", "hourly", "never"];

/// Configuration error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `logging.level` is not a tracing level.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// `logging.format` is neither json nor pretty.
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// `logging.rotation` is not a known schedule.
    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    /// `database.path` is blank.
    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    /// `database.max_connections` is zero.
    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    /// `database.min_connections` exceeds the maximum.
    #[error("Invalid min_connections: {0}. Cannot exceed max_connections ({1})")]
    InvalidMinConnections(u32, u32),

    /// `retry.max_retries` is zero.
    #[error("Invalid max_retries: {0}. Cannot be 0")]
    InvalidMaxRetries(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    /// Initial backoff is not below the maximum.
    InvalidBackoff(u64, u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the project directory.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. .brokerage/config.yaml (created by init)
    /// 3. .brokerage/local.yaml (optional local overrides)
    /// 4. BROKERAGE_* environment variables
    pub fn load() -> Result<Config> {
        Self::load_from_dir(CONFIG_DIR)
    }

    /// Same precedence as [`ConfigLoader::load`], rooted at `dir`.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Config> {
        let dir = dir.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file; environment overrides still apply.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Path of the primary config file inside `dir`.
    pub fn config_path(dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join("config.yaml")
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let database = &config.database;
        if database.path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(database.max_connections));
        }
        if database.min_connections > database.max_connections {
            return Err(ConfigError::InvalidMinConnections(
                database.min_connections,
                database.max_connections,
            ));
        }

        let logging = &config.logging;
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(logging.level.clone()));
        }
        if !LOG_FORMATS.contains(&logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(logging.format.clone()));
        }
        if !ROTATIONS.contains(&logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(logging.rotation.clone()));
        }

        let retry = &config.retry;
        if retry.max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(retry.max_retries));
        }
        if retry.initial_backoff_ms >= retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                retry.initial_backoff_ms,
                retry.max_backoff_ms,
            ));
        }

        Ok(())
    }
}
