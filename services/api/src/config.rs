//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use chrono::{DateTime, Utc};
use std::net::SocketAddr;
use tracing::Level;

use journal_core::DEFAULT_EPOCH;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    /// The instant world day 0 began.
    pub world_epoch: DateTime<Utc>,
    pub min_submit_interval_secs: i64,
    pub min_text_len: usize,
    /// How many day-groups one timeline response renders.
    pub max_timeline_days: usize,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load World Clock and Gate Settings ---
        let epoch_str = std::env::var("WORLD_EPOCH").unwrap_or_else(|_| DEFAULT_EPOCH.to_string());
        let world_epoch = DateTime::parse_from_rfc3339(&epoch_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| ConfigError::InvalidValue("WORLD_EPOCH".to_string(), e.to_string()))?;

        let min_submit_interval_secs = parse_var("MIN_SUBMIT_INTERVAL_SECS", 60)?;
        let min_text_len = parse_var("MIN_TEXT_LEN", 12)?;
        let max_timeline_days = parse_var("MAX_TIMELINE_DAYS", 14)?;

        let cors_origin =
            std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            world_epoch,
            min_submit_interval_secs,
            min_text_len,
            max_timeline_days,
            cors_origin,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}
