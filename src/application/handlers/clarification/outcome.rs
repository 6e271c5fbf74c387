//! Outcome returned by the clarification command handlers.

use crate::application::machine::ResumeError;
use crate::domain::clarification::{BlobError, QueryRecord, QueryStatus, ResumeBlob};

/// What the caller has to do next with a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextAction {
    /// Ask the user this question and resume with their answer.
    ProvideClarification { question: String },
    /// Show the reformulation and resume with accept/reject.
    ConfirmReformulation { reformulated_query: String },
    /// Nothing left to do; use `final_query`.
    Done { final_query: String },
    /// The query failed.
    Failed { message: String },
}

/// A record together with the blob needed to resume it.
#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    pub record: QueryRecord,
    /// Present only while the record awaits the caller.
    pub blob: Option<ResumeBlob>,
    pub next: NextAction,
}

impl ResolutionOutcome {
    pub fn from_record(record: QueryRecord) -> Result<Self, BlobError> {
        let blob = if record.status().awaits_caller() {
            Some(record.to_blob()?)
        } else {
            None
        };
        let next = next_action(&record);
        Ok(Self { record, blob, next })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.next, NextAction::Failed { .. })
    }
}

fn next_action(record: &QueryRecord) -> NextAction {
    match record.status() {
        QueryStatus::AwaitingClarification => NextAction::ProvideClarification {
            question: record.clarifying_question().unwrap_or_default().to_string(),
        },
        QueryStatus::AwaitingConfirmation => NextAction::ConfirmReformulation {
            reformulated_query: record.reformulated_query().unwrap_or_default().to_string(),
        },
        QueryStatus::Error => NextAction::Failed {
            message: record.error_message().unwrap_or_default().to_string(),
        },
        _ => NextAction::Done {
            final_query: record.final_output().to_string(),
        },
    }
}

/// Errors from the clarification command handlers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClarificationCommandError {
    #[error("Query text must not be empty")]
    EmptyQuery,

    #[error(transparent)]
    Resume(#[from] ResumeError),

    #[error("Failed to encode resume blob: {0}")]
    Encoding(BlobError),
}
