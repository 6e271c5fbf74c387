//! Errors returned by the capability ports.

use crate::domain::clarification::ResolutionError;

use super::ai_provider::AIError;

/// Tagged failure of a detector or resolver call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The capability answered, but not in the agreed shape.
    #[error("Schema violation: {reason} (raw output: {raw})")]
    SchemaViolation { raw: String, reason: String },

    /// The capability could not be reached or failed to answer.
    #[error("{0}")]
    Generation(String),
}

impl PortError {
    pub fn schema_violation(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaViolation {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }
}

impl From<AIError> for PortError {
    fn from(err: AIError) -> Self {
        Self::Generation(err.to_string())
    }
}

impl From<PortError> for ResolutionError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::SchemaViolation { raw, reason } => {
                ResolutionError::SchemaViolation { raw, reason }
            }
            PortError::Generation(message) => ResolutionError::Generation(message),
        }
    }
}
