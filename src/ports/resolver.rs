//! Resolver port - the capable tier that asks, validates and rewrites.

use async_trait::async_trait;

use crate::domain::clarification::AmbiguityKind;

use super::errors::PortError;

/// A classification plus clarifying question for an ambiguous query.
///
/// `kinds` is left as raw tags: the resolution machine checks them against
/// the taxonomy so that an unknown tag is reported as a schema violation.
/// Strategies that skip classification return `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClarificationDraft {
    pub kinds: Option<Vec<String>>,
    pub reasoning: Option<String>,
    pub question: String,
}

/// Everything the resolver needs to judge or use a clarification answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClarificationExchange {
    pub query: String,
    pub kinds: Vec<AmbiguityKind>,
    pub question: String,
    pub answer: String,
}

/// Verdict on whether an answer resolves the ambiguity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub feedback: String,
}

impl ValidationVerdict {
    pub fn valid(feedback: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            feedback: feedback.into(),
        }
    }

    pub fn invalid(feedback: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            feedback: feedback.into(),
        }
    }
}

/// Port for the higher-cost tier.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Classify the ambiguity and produce a clarifying question.
    async fn generate_clarification(&self, query: &str) -> Result<ClarificationDraft, PortError>;

    /// Judge whether the user's answer resolves the ambiguity.
    async fn validate(&self, exchange: &ClarificationExchange)
        -> Result<ValidationVerdict, PortError>;

    /// Rewrite the query so that it carries the clarified intent.
    async fn reformulate(&self, exchange: &ClarificationExchange) -> Result<String, PortError>;

    /// Verify the backing capability is reachable.
    async fn check_connection(&self) -> Result<(), PortError> {
        Ok(())
    }
}
