//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `RAGCHAT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use ragchat_client::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Talking to {}", config.backend.base_url);
//! ```

mod auth;
mod backend;
mod error;
mod logging;

pub use auth::{AuthConfig, CredentialSource};
pub use backend::BackendConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a client for
/// the local development service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Chatbot service location and timeout
    #[serde(default)]
    pub backend: BackendConfig,

    /// Bearer credential source
    #[serde(default)]
    pub auth: AuthConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `RAGCHAT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `RAGCHAT__BACKEND__BASE_URL=https://...` -> `backend.base_url`
    /// - `RAGCHAT__AUTH__TOKEN_FILE=~/.ragchat/token` -> `auth.token_file`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RAGCHAT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.backend.validate()?;
        self.auth.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
