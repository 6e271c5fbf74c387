//! HTTP DTOs for the clarification endpoints.
//!
//! The resume blob travels as an opaque JSON object under `context`; clients
//! echo it back unchanged.

use serde::{Deserialize, Serialize};

use crate::application::handlers::clarification::{NextAction, ResolutionOutcome};
use crate::domain::clarification::{QueryRecord, ResumeBlob};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to resolve a new query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub text: String,
}

/// Request answering a clarifying question.
#[derive(Debug, Clone, Deserialize)]
pub struct ClarifyRequest {
    pub context: ResumeBlob,
    pub answer: String,
}

/// Request accepting or replacing a reformulated query.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmRequest {
    pub context: ResumeBlob,
    pub confirmation: bool,
    #[serde(default)]
    pub alternative_query: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// What the client should do with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Completed,
    ClarificationNeeded,
    ConfirmationNeeded,
}

/// Response for every successful step of the resolution flow.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub status: ResponseStatus,
    pub query_id: String,
    pub original_query: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ambiguity_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarifying_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reformulated_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ResumeBlob>,
}

impl QueryResponse {
    /// Builds the response for a non-failed outcome.
    ///
    /// Failed outcomes are reported through [`ErrorResponse::resolution_failed`].
    pub fn from_outcome(outcome: ResolutionOutcome) -> Self {
        let ResolutionOutcome { record, blob, next } = outcome;
        let status = match next {
            NextAction::ProvideClarification { .. } => ResponseStatus::ClarificationNeeded,
            NextAction::ConfirmReformulation { .. } => ResponseStatus::ConfirmationNeeded,
            NextAction::Done { .. } | NextAction::Failed { .. } => ResponseStatus::Completed,
        };
        let final_query = match status {
            ResponseStatus::Completed => Some(record.final_output().to_string()),
            _ => None,
        };

        Self {
            status,
            query_id: record.query_id().to_string(),
            original_query: record.original_query().to_string(),
            ambiguity_types: record
                .ambiguity_kinds()
                .iter()
                .map(|kind| kind.as_str().to_string())
                .collect(),
            clarifying_question: record.clarifying_question().map(str::to_string),
            reformulated_query: record.reformulated_query().map(str::to_string),
            confirmed_query: record.confirmed_query().map(str::to_string),
            final_query,
            context: blob,
        }
    }
}

/// Connectivity of one model tier.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentHealth {
    pub fn from_check<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                reachable: true,
                error: None,
            },
            Err(e) => Self {
                reachable: false,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Response for the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub detector: ComponentHealth,
    pub resolver: ComponentHealth,
}

impl HealthResponse {
    pub fn new(detector: ComponentHealth, resolver: ComponentHealth) -> Self {
        let status = if detector.reachable && resolver.reachable {
            "ok"
        } else {
            "degraded"
        };
        Self {
            status,
            detector,
            resolver,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            code: "CONFLICT".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// A record that ended in `ERROR`.
    pub fn resolution_failed(record: &QueryRecord) -> Self {
        Self {
            code: "RESOLUTION_FAILED".to_string(),
            message: record
                .error_message()
                .unwrap_or("Query resolution failed")
                .to_string(),
            details: Some(serde_json::json!({
                "query_id": record.query_id().to_string(),
                "original_query": record.original_query(),
                "error_kind": record.error_kind().map(|kind| kind.to_string()),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_request_alternative_is_optional() {
        let json = r#"{"context": {"status": "AWAITING_CONFIRMATION"}, "confirmation": true}"#;
        let req: ConfirmRequest = serde_json::from_str(json).unwrap();
        assert!(req.confirmation);
        assert!(req.alternative_query.is_none());
    }

    #[test]
    fn clarify_request_rejects_non_object_context() {
        let json = r#"{"context": "not a blob", "answer": "Egypt"}"#;
        assert!(serde_json::from_str::<ClarifyRequest>(json).is_err());
    }

    #[test]
    fn response_status_serializes_snake_case() {
        let json = serde_json::to_string(&ResponseStatus::ClarificationNeeded).unwrap();
        assert_eq!(json, "\"clarification_needed\"");
    }

    #[test]
    fn health_is_degraded_when_a_tier_is_down() {
        let health = HealthResponse::new(
            ComponentHealth::from_check::<String>(Ok(())),
            ComponentHealth::from_check(Err("connection refused".to_string())),
        );
        assert_eq!(health.status, "degraded");
        assert_eq!(health.resolver.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn error_response_bad_request_creates_correctly() {
        let error = ErrorResponse::bad_request("Invalid input");
        assert_eq!(error.code, "BAD_REQUEST");
        assert_eq!(error.message, "Invalid input");
        assert!(error.details.is_none());
    }
}
