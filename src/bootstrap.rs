//! Process wiring shared by the binaries: logging and the model-backed
//! resolution machine.

use std::sync::Arc;

use crate::adapters::ai::{OpenAICompatConfig, OpenAICompatProvider};
use crate::adapters::generation::{LlmDetector, LlmResolver};
use crate::application::{ResolutionMachine, ResolutionSettings};
use crate::config::{AppConfig, LogFormat, ModelsConfig, ServerConfig};
use crate::ports::AIError;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `server.log_level`. Output goes to stderr so the
/// interactive CLI keeps stdout for the conversation. Calling this twice is a
/// no-op.
pub fn init_tracing(server: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let _ = match server.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
}

/// OpenAI-compatible client settings for the detector tier.
pub fn detector_provider_config(models: &ModelsConfig) -> OpenAICompatConfig {
    OpenAICompatConfig::new(models.api_key.clone())
        .with_base_url(models.detector_url.clone())
        .with_model(models.detector_model.clone())
        .with_timeout(models.timeout())
        .with_max_retries(models.max_retries)
}

/// OpenAI-compatible client settings for the resolver tier.
pub fn resolver_provider_config(models: &ModelsConfig) -> OpenAICompatConfig {
    OpenAICompatConfig::new(models.api_key.clone())
        .with_base_url(models.resolver_url.clone())
        .with_model(models.resolver_model.clone())
        .with_timeout(models.timeout())
        .with_max_retries(models.max_retries)
}

/// Builds a machine whose ports talk to the configured model servers.
pub fn build_machine(config: &AppConfig) -> Result<ResolutionMachine, AIError> {
    let detector_provider = OpenAICompatProvider::new(detector_provider_config(&config.models))?;
    let resolver_provider = OpenAICompatProvider::new(resolver_provider_config(&config.models))?;

    let detector = LlmDetector::new(Arc::new(detector_provider));
    let resolver = LlmResolver::new(
        Arc::new(resolver_provider),
        config.pipeline.clarification_strategy,
    );

    tracing::info!(
        detector_url = %config.models.detector_url,
        resolver_url = %config.models.resolver_url,
        strategy = %config.pipeline.clarification_strategy,
        "Resolution machine configured"
    );

    Ok(ResolutionMachine::new(
        Arc::new(detector),
        Arc::new(resolver),
        ResolutionSettings::from(&config.pipeline),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_configs_target_each_tier() {
        let config = AppConfig::default();

        let detector = detector_provider_config(&config.models);
        let resolver = resolver_provider_config(&config.models);

        assert_eq!(detector.base_url, config.models.detector_url);
        assert_eq!(detector.model, config.models.detector_model);
        assert_eq!(resolver.base_url, config.models.resolver_url);
        assert_eq!(resolver.model, config.models.resolver_model);
        assert_eq!(detector.timeout, config.models.timeout());
    }

    #[test]
    fn build_machine_uses_pipeline_settings() {
        let mut config = AppConfig::default();
        config.pipeline.max_clarification_attempts = 2;
        config.pipeline.validate_clarifications = false;

        let machine = build_machine(&config).unwrap();

        assert_eq!(machine.settings().max_clarification_attempts, 2);
        assert!(!machine.settings().validate_clarifications);
    }
}
