//! services/gateway/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Base URL of the backend AI service.
    pub api_endpoint: String,
    /// Bearer token sent on every backend request.
    pub api_key: String,
    pub deployment_id: String,
    pub deployment_name: String,
    /// The raw template key; preset resolution happens separately so the
    /// export artifact can carry the value as configured.
    pub industry_template: String,
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

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Backend Connection Settings ---
        let api_endpoint = std::env::var("API_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        let api_key = std::env::var("API_KEY").unwrap_or_default();

        // --- Load Deployment Identity ---
        let deployment_id = std::env::var("DEPLOYMENT_ID").unwrap_or_default();
        let deployment_name =
            std::env::var("DEPLOYMENT_NAME").unwrap_or_else(|_| "AI Assistant".to_string());
        let industry_template =
            std::env::var("INDUSTRY_TEMPLATE").unwrap_or_else(|_| "general".to_string());

        Ok(Self {
            bind_address,
            log_level,
            api_endpoint,
            api_key,
            deployment_id,
            deployment_name,
            industry_template,
        })
    }
}
