//! Resolution pipeline configuration

use serde::Deserialize;

use crate::domain::clarification::ClarificationStrategy;

use super::error::ValidationError;

/// Knobs of the resolution state machine
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Clarification answers accepted before giving up
    #[serde(default = "default_max_attempts")]
    pub max_clarification_attempts: u32,

    /// How the resolver asks its clarifying question
    #[serde(default)]
    pub clarification_strategy: ClarificationStrategy,

    /// Whether answers are validated before reformulation
    #[serde(default = "default_validate")]
    pub validate_clarifications: bool,

    /// Queries resolved in parallel by the batch runner
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

impl PipelineConfig {
    /// Validate pipeline configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_clarification_attempts == 0 {
            return Err(ValidationError::InvalidAttemptBound);
        }
        if self.batch_concurrency == 0 {
            return Err(ValidationError::InvalidConcurrency);
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_clarification_attempts: default_max_attempts(),
            clarification_strategy: ClarificationStrategy::default(),
            validate_clarifications: default_validate(),
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_validate() -> bool {
    true
}

fn default_batch_concurrency() -> usize {
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_clarification_attempts, 3);
        assert_eq!(config.clarification_strategy, ClarificationStrategy::AtStandard);
        assert!(config.validate_clarifications);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_attempts_is_rejected() {
        let config = PipelineConfig {
            max_clarification_attempts: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidAttemptBound));
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let config = PipelineConfig {
            batch_concurrency: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidConcurrency));
    }
}
