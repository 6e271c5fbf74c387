//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CLARIGEN` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use clarigen::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod models;
mod pipeline;
mod server;

pub use error::{ConfigError, ValidationError};
pub use models::ModelsConfig;
pub use pipeline::PipelineConfig;
pub use server::{LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a config that
/// talks to model servers on localhost.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server and logging
    #[serde(default)]
    pub server: ServerConfig,

    /// Detector and resolver model servers
    #[serde(default)]
    pub models: ModelsConfig,

    /// Resolution state machine settings
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CLARIGEN` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CLARIGEN__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CLARIGEN__PIPELINE__MAX_CLARIFICATION_ATTEMPTS=2` -> `pipeline.max_clarification_attempts = 2`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CLARIGEN")
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
        self.server.validate()?;
        self.models.validate()?;
        self.pipeline.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clarification::ClarificationStrategy;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "CLARIGEN__SERVER__PORT",
        "CLARIGEN__SERVER__LOG_FORMAT",
        "CLARIGEN__MODELS__RESOLVER_URL",
        "CLARIGEN__PIPELINE__MAX_CLARIFICATION_ATTEMPTS",
        "CLARIGEN__PIPELINE__CLARIFICATION_STRATEGY",
        "CLARIGEN__PIPELINE__VALIDATE_CLARIFICATIONS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8370);
        assert_eq!(config.models.detector_url, "http://localhost:8368/v1");
        assert_eq!(config.pipeline.max_clarification_attempts, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CLARIGEN__SERVER__PORT", "9000");
        env::set_var("CLARIGEN__SERVER__LOG_FORMAT", "json");
        env::set_var("CLARIGEN__MODELS__RESOLVER_URL", "http://gpu-box:8000/v1");
        env::set_var("CLARIGEN__PIPELINE__MAX_CLARIFICATION_ATTEMPTS", "2");
        env::set_var("CLARIGEN__PIPELINE__CLARIFICATION_STRATEGY", "vanilla");
        env::set_var("CLARIGEN__PIPELINE__VALIDATE_CLARIFICATIONS", "false");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.models.resolver_url, "http://gpu-box:8000/v1");
        assert_eq!(config.pipeline.max_clarification_attempts, 2);
        assert_eq!(
            config.pipeline.clarification_strategy,
            ClarificationStrategy::Vanilla
        );
        assert!(!config.pipeline.validate_clarifications);
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("CLARIGEN__PIPELINE__MAX_CLARIFICATION_ATTEMPTS", "0");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.validate(), Err(ValidationError::InvalidAttemptBound));
    }
}
