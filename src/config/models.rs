//! Model server configuration for the detector and resolver tiers

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Connection settings for both OpenAI-compatible model servers
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Base URL of the small (detector) server, including `/v1`
    #[serde(default = "default_detector_url")]
    pub detector_url: String,

    /// Model served for detection
    #[serde(default = "default_detector_model")]
    pub detector_model: String,

    /// Base URL of the large (resolver) server, including `/v1`
    #[serde(default = "default_resolver_url")]
    pub resolver_url: String,

    /// Model served for clarification, validation and reformulation
    #[serde(default = "default_resolver_model")]
    pub resolver_model: String,

    /// Bearer token accepted by both servers
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Transport retries for retryable failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl ModelsConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate model server configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_url("detector_url", &self.detector_url)?;
        check_url("resolver_url", &self.resolver_url)?;
        if self.detector_model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("DETECTOR_MODEL"));
        }
        if self.resolver_model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("RESOLVER_MODEL"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn check_url(field: &'static str, url: &str) -> Result<(), ValidationError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::InvalidModelUrl {
            field,
            url: url.to_string(),
        })
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            detector_url: default_detector_url(),
            detector_model: default_detector_model(),
            resolver_url: default_resolver_url(),
            resolver_model: default_resolver_model(),
            api_key: default_api_key(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_detector_url() -> String {
    "http://localhost:8368/v1".to_string()
}

fn default_detector_model() -> String {
    "meta-llama/Llama-3.1-8B-Instruct".to_string()
}

fn default_resolver_url() -> String {
    "http://localhost:8369/v1".to_string()
}

fn default_resolver_model() -> String {
    "nvidia/Llama-3.3-70B-Instruct-FP8".to_string()
}

fn default_api_key() -> String {
    "token-abc123".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_config_defaults() {
        let config = ModelsConfig::default();
        assert_eq!(config.detector_url, "http://localhost:8368/v1");
        assert_eq!(config.resolver_url, "http://localhost:8369/v1");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.max_retries, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_url_without_scheme_is_rejected() {
        let config = ModelsConfig {
            resolver_url: "localhost:8369/v1".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidModelUrl {
                field: "resolver_url",
                url: "localhost:8369/v1".to_string(),
            })
        );
    }

    #[test]
    fn test_blank_model_is_rejected() {
        let config = ModelsConfig {
            detector_model: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("DETECTOR_MODEL"))
        );
    }
}
