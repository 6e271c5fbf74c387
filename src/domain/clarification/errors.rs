//! Failure taxonomy of the resolution pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::TransitionError;

use super::ambiguity::TaxonomyError;
use super::status::QueryStatus;

/// Everything that can drive a query record into `ERROR`.
///
/// These never escape the resolution machine: they are written onto the
/// record as `error_message` / `error_kind` and the record is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("Schema violation: {reason} (raw output: {raw})")]
    SchemaViolation { raw: String, reason: String },

    /// Transport or availability failure; the port's message is kept verbatim.
    #[error("{0}")]
    Generation(String),

    #[error("Maximum clarification attempts ({attempts}) reached with invalid responses")]
    ExhaustedRetries { attempts: u32 },

    #[error("Reformulation was rejected but no alternative query was supplied")]
    MissingAlternative,

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: QueryStatus, to: QueryStatus },

    #[error("Clarification source closed before an answer was given")]
    AnswerSourceClosed,
}

impl ResolutionError {
    /// Creates a schema violation for output that could not be accepted.
    pub fn schema_violation(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaViolation {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Creates a generation (transport) error.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Machine-readable tag for this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            ResolutionError::SchemaViolation { .. } => FailureKind::SchemaViolation,
            ResolutionError::Generation(_) => FailureKind::GenerationError,
            ResolutionError::ExhaustedRetries { .. } => FailureKind::ExhaustedRetries,
            ResolutionError::MissingAlternative => FailureKind::MissingAlternative,
            ResolutionError::InvalidTransition { .. } => FailureKind::InvalidTransition,
            ResolutionError::AnswerSourceClosed => FailureKind::AnswerSourceClosed,
        }
    }

    /// Builds a schema violation from a rejected classification result.
    pub fn from_taxonomy(raw_kinds: &[String], err: TaxonomyError) -> Self {
        Self::schema_violation(format!("{:?}", raw_kinds), err.to_string())
    }
}

impl From<TransitionError<QueryStatus>> for ResolutionError {
    fn from(err: TransitionError<QueryStatus>) -> Self {
        Self::InvalidTransition {
            from: err.from,
            to: err.to,
        }
    }
}

/// Serializable tag recorded next to `error_message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    SchemaViolation,
    GenerationError,
    ExhaustedRetries,
    MissingAlternative,
    InvalidTransition,
    AnswerSourceClosed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::SchemaViolation => "SCHEMA_VIOLATION",
            FailureKind::GenerationError => "GENERATION_ERROR",
            FailureKind::ExhaustedRetries => "EXHAUSTED_RETRIES",
            FailureKind::MissingAlternative => "MISSING_ALTERNATIVE",
            FailureKind::InvalidTransition => "INVALID_TRANSITION",
            FailureKind::AnswerSourceClosed => "ANSWER_SOURCE_CLOSED",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::StateMachine;

    #[test]
    fn generation_message_is_verbatim() {
        let err = ResolutionError::generation("connection refused by 10.0.0.4:8369");
        assert_eq!(err.to_string(), "connection refused by 10.0.0.4:8369");
    }

    #[test]
    fn exhausted_retries_mentions_attempts() {
        let err = ResolutionError::ExhaustedRetries { attempts: 2 };
        assert_eq!(
            err.to_string(),
            "Maximum clarification attempts (2) reached with invalid responses"
        );
        assert_eq!(err.kind(), FailureKind::ExhaustedRetries);
    }

    #[test]
    fn taxonomy_rejection_becomes_schema_violation() {
        let raw = vec!["NONE".to_string(), "WHO".to_string()];
        let err = ResolutionError::from_taxonomy(&raw, TaxonomyError::NoneWithOthers);
        assert_eq!(err.kind(), FailureKind::SchemaViolation);
        assert!(err.to_string().contains("NONE cannot be combined"));
    }

    #[test]
    fn transition_error_converts() {
        let err: ResolutionError = QueryStatus::Completed
            .transition_to(QueryStatus::Reformulating)
            .unwrap_err()
            .into();
        assert_eq!(
            err.to_string(),
            "Invalid transition from COMPLETED to REFORMULATING"
        );
    }

    #[test]
    fn failure_kind_display_matches_serde_tag() {
        let kind = FailureKind::MissingAlternative;
        assert_eq!(
            serde_json::to_string(&kind).unwrap(),
            format!("\"{}\"", kind)
        );
    }
}
