//! QueryRecord - the state threaded through every resolution step.
//!
//! A record is created once per incoming query and then mutated only by the
//! transition methods below, each of which is checked against the
//! [`QueryStatus`] graph. Callers can read every field but cannot change one;
//! in stateless mode they carry the record around as a [`ResumeBlob`].
//!
//! [`ResumeBlob`]: super::ResumeBlob

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{QueryId, StateMachine, Timestamp, ValidationError};

use super::ambiguity::{check_kind_set, AmbiguityKind};
use super::errors::{FailureKind, ResolutionError};
use super::status::QueryStatus;

/// What a successful reformulation leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterReformulation {
    /// Pause for the caller to accept or replace the reformulation.
    AwaitConfirmation,
    /// Finish immediately; the reformulation is the final output.
    Complete,
}

/// A user query and everything the pipeline learned about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryRecord {
    query_id: QueryId,
    original_query: String,
    status: QueryStatus,
    is_ambiguous: Option<bool>,
    #[serde(default)]
    ambiguity_kinds: Vec<AmbiguityKind>,
    ambiguity_reasoning: Option<String>,
    clarifying_question: Option<String>,
    user_clarification: Option<String>,
    clarification_is_valid: Option<bool>,
    clarification_validation_feedback: Option<String>,
    reformulated_query: Option<String>,
    confirmed_query: Option<String>,
    clarification_attempts: u32,
    created_at: Timestamp,
    error_message: Option<String>,
    error_kind: Option<FailureKind>,
}

impl QueryRecord {
    /// Creates a record in `INITIAL` holding only the query text.
    pub fn new(original_query: impl Into<String>) -> Self {
        Self {
            query_id: QueryId::new(),
            original_query: original_query.into(),
            status: QueryStatus::Initial,
            is_ambiguous: None,
            ambiguity_kinds: Vec::new(),
            ambiguity_reasoning: None,
            clarifying_question: None,
            user_clarification: None,
            clarification_is_valid: None,
            clarification_validation_feedback: None,
            reformulated_query: None,
            confirmed_query: None,
            clarification_attempts: 0,
            created_at: Timestamp::now(),
            error_message: None,
            error_kind: None,
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════════

    pub fn query_id(&self) -> QueryId {
        self.query_id
    }

    pub fn original_query(&self) -> &str {
        &self.original_query
    }

    pub fn status(&self) -> QueryStatus {
        self.status
    }

    pub fn is_ambiguous(&self) -> Option<bool> {
        self.is_ambiguous
    }

    pub fn ambiguity_kinds(&self) -> &[AmbiguityKind] {
        &self.ambiguity_kinds
    }

    pub fn ambiguity_reasoning(&self) -> Option<&str> {
        self.ambiguity_reasoning.as_deref()
    }

    pub fn clarifying_question(&self) -> Option<&str> {
        self.clarifying_question.as_deref()
    }

    pub fn user_clarification(&self) -> Option<&str> {
        self.user_clarification.as_deref()
    }

    pub fn clarification_is_valid(&self) -> Option<bool> {
        self.clarification_is_valid
    }

    pub fn clarification_validation_feedback(&self) -> Option<&str> {
        self.clarification_validation_feedback.as_deref()
    }

    pub fn reformulated_query(&self) -> Option<&str> {
        self.reformulated_query.as_deref()
    }

    pub fn confirmed_query(&self) -> Option<&str> {
        self.confirmed_query.as_deref()
    }

    /// Number of clarification answers submitted so far.
    pub fn clarification_attempts(&self) -> u32 {
        self.clarification_attempts
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn error_kind(&self) -> Option<FailureKind> {
        self.error_kind
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The query text downstream consumers should use.
    ///
    /// Clear (or undetected) queries pass through unchanged. Ambiguous ones
    /// prefer the confirmed text, then the reformulation, and only fall back
    /// to the original when neither exists.
    pub fn final_output(&self) -> &str {
        if self.is_ambiguous != Some(true) {
            return &self.original_query;
        }
        self.confirmed_query
            .as_deref()
            .or(self.reformulated_query.as_deref())
            .unwrap_or(&self.original_query)
    }

    // ════════════════════════════════════════════════════════════════════
    // Transitions
    // ════════════════════════════════════════════════════════════════════

    fn advance(&mut self, to: QueryStatus) -> Result<(), ResolutionError> {
        self.status = self.status.transition_to(to)?;
        Ok(())
    }

    /// INITIAL -> CHECKING_AMBIGUITY
    pub(crate) fn begin_detection(&mut self) -> Result<(), ResolutionError> {
        self.advance(QueryStatus::CheckingAmbiguity)
    }

    /// CHECKING_AMBIGUITY -> AMBIGUOUS | NOT_AMBIGUOUS
    pub(crate) fn record_detection(&mut self, is_ambiguous: bool) -> Result<(), ResolutionError> {
        let next = if is_ambiguous {
            QueryStatus::Ambiguous
        } else {
            QueryStatus::NotAmbiguous
        };
        self.advance(next)?;
        self.is_ambiguous = Some(is_ambiguous);
        Ok(())
    }

    /// NOT_AMBIGUOUS -> COMPLETED
    pub(crate) fn complete_unambiguous(&mut self) -> Result<(), ResolutionError> {
        self.advance(QueryStatus::Completed)
    }

    /// AMBIGUOUS -> AWAITING_CLARIFICATION
    pub(crate) fn record_clarification(
        &mut self,
        kinds: Vec<AmbiguityKind>,
        reasoning: Option<String>,
        question: String,
    ) -> Result<(), ResolutionError> {
        self.advance(QueryStatus::AwaitingClarification)?;
        self.ambiguity_kinds = kinds;
        self.ambiguity_reasoning = reasoning;
        self.clarifying_question = Some(question);
        Ok(())
    }

    /// AWAITING_CLARIFICATION -> CLARIFICATION_RECEIVED, counting the attempt.
    pub(crate) fn submit_clarification(&mut self, answer: String) -> Result<(), ResolutionError> {
        self.advance(QueryStatus::ClarificationReceived)?;
        self.user_clarification = Some(answer);
        self.clarification_attempts += 1;
        Ok(())
    }

    /// CLARIFICATION_RECEIVED -> VALIDATING_CLARIFICATION
    pub(crate) fn begin_validation(&mut self) -> Result<(), ResolutionError> {
        self.advance(QueryStatus::ValidatingClarification)
    }

    /// Stores a validation verdict; an invalid one moves to CLARIFICATION_INVALID.
    pub(crate) fn record_validation(
        &mut self,
        is_valid: bool,
        feedback: String,
    ) -> Result<(), ResolutionError> {
        if self.status != QueryStatus::ValidatingClarification {
            return Err(ResolutionError::InvalidTransition {
                from: self.status,
                to: QueryStatus::ValidatingClarification,
            });
        }
        if !is_valid {
            self.advance(QueryStatus::ClarificationInvalid)?;
        }
        self.clarification_is_valid = Some(is_valid);
        self.clarification_validation_feedback = Some(feedback);
        Ok(())
    }

    /// CLARIFICATION_INVALID -> AWAITING_CLARIFICATION, folding the feedback
    /// into the question shown for the next attempt.
    pub(crate) fn request_retry(&mut self) -> Result<(), ResolutionError> {
        self.advance(QueryStatus::AwaitingClarification)?;
        let question = self.clarifying_question.take().unwrap_or_default();
        let feedback = self
            .clarification_validation_feedback
            .as_deref()
            .unwrap_or_default();
        self.clarifying_question = Some(format!(
            "{}\n\n(Your previous answer was unclear: {}. Please try again.)",
            question, feedback
        ));
        Ok(())
    }

    /// CLARIFICATION_RECEIVED | VALIDATING_CLARIFICATION -> REFORMULATING
    pub(crate) fn begin_reformulation(&mut self) -> Result<(), ResolutionError> {
        self.advance(QueryStatus::Reformulating)
    }

    /// REFORMULATING -> AWAITING_CONFIRMATION | COMPLETED
    pub(crate) fn record_reformulation(
        &mut self,
        reformulated: String,
        next: AfterReformulation,
    ) -> Result<(), ResolutionError> {
        let to = match next {
            AfterReformulation::AwaitConfirmation => QueryStatus::AwaitingConfirmation,
            AfterReformulation::Complete => QueryStatus::Completed,
        };
        self.advance(to)?;
        self.reformulated_query = Some(reformulated);
        Ok(())
    }

    /// AWAITING_CONFIRMATION -> COMPLETED
    ///
    /// Accepting keeps the reformulation. Rejecting requires a non-blank
    /// alternative; without one the call fails with `MissingAlternative`
    /// and the record is left untouched.
    pub(crate) fn confirm(
        &mut self,
        accepted: bool,
        alternative: Option<String>,
    ) -> Result<(), ResolutionError> {
        if self.status != QueryStatus::AwaitingConfirmation {
            return Err(ResolutionError::InvalidTransition {
                from: self.status,
                to: QueryStatus::Completed,
            });
        }

        let confirmed = if accepted {
            self.reformulated_query.clone()
        } else {
            match alternative.filter(|alt| !alt.trim().is_empty()) {
                Some(alt) => Some(alt),
                None => return Err(ResolutionError::MissingAlternative),
            }
        };

        self.advance(QueryStatus::Completed)?;
        self.confirmed_query = confirmed;
        Ok(())
    }

    /// Moves any non-terminal record to ERROR.
    ///
    /// Returns false (and changes nothing) when the record is already terminal.
    pub(crate) fn fail(&mut self, error: &ResolutionError) -> bool {
        if self.advance(QueryStatus::Error).is_err() {
            return false;
        }
        self.error_message = Some(error.to_string());
        self.error_kind = Some(error.kind());
        true
    }

    // ════════════════════════════════════════════════════════════════════
    // Integrity
    // ════════════════════════════════════════════════════════════════════

    /// Checks cross-field invariants that the type system cannot express.
    ///
    /// Records built through the transition methods always pass; this guards
    /// records decoded from a caller-supplied blob.
    pub fn check_invariants(&self) -> Result<(), ValidationError> {
        if !self.ambiguity_kinds.is_empty() {
            check_kind_set(&self.ambiguity_kinds)
                .map_err(|e| ValidationError::invalid_format("ambiguity_kinds", e.to_string()))?;
            let mut seen = Vec::with_capacity(self.ambiguity_kinds.len());
            for kind in &self.ambiguity_kinds {
                if seen.contains(kind) {
                    return Err(ValidationError::invalid_format(
                        "ambiguity_kinds",
                        format!("duplicate kind {}", kind),
                    ));
                }
                seen.push(*kind);
            }
        }

        let failed = self.status == QueryStatus::Error;
        if failed && self.error_message.is_none() {
            return Err(ValidationError::empty_field("error_message"));
        }
        if !failed && (self.error_message.is_some() || self.error_kind.is_some()) {
            return Err(ValidationError::invalid_format(
                "error_message",
                format!("set while status is {}", self.status),
            ));
        }

        let detected = !matches!(
            self.status,
            QueryStatus::Initial | QueryStatus::CheckingAmbiguity | QueryStatus::Error
        );
        if detected && self.is_ambiguous.is_none() {
            return Err(ValidationError::empty_field("is_ambiguous"));
        }
        if self.status == QueryStatus::NotAmbiguous && self.is_ambiguous != Some(false) {
            return Err(ValidationError::invalid_format(
                "is_ambiguous",
                "must be false for NOT_AMBIGUOUS",
            ));
        }

        match self.status {
            QueryStatus::AwaitingClarification if self.clarifying_question.is_none() => {
                Err(ValidationError::empty_field("clarifying_question"))
            }
            QueryStatus::AwaitingConfirmation if self.reformulated_query.is_none() => {
                Err(ValidationError::empty_field("reformulated_query"))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn awaiting_clarification() -> QueryRecord {
        let mut record = QueryRecord::new("Tell me about the source of Nile.");
        record.begin_detection().unwrap();
        record.record_detection(true).unwrap();
        record
            .record_clarification(
                vec![AmbiguityKind::Lexical],
                Some("'source' is ambiguous".to_string()),
                "geography or informational sources?".to_string(),
            )
            .unwrap();
        record
    }

    fn awaiting_confirmation() -> QueryRecord {
        let mut record = awaiting_clarification();
        record.submit_clarification("geographical origin".to_string()).unwrap();
        record.begin_validation().unwrap();
        record.record_validation(true, "clear".to_string()).unwrap();
        record.begin_reformulation().unwrap();
        record
            .record_reformulation(
                "Where does the Nile River originate?".to_string(),
                AfterReformulation::AwaitConfirmation,
            )
            .unwrap();
        record
    }

    #[test]
    fn new_record_is_initial_and_empty() {
        let record = QueryRecord::new("What is 2 + 2?");
        assert_eq!(record.status(), QueryStatus::Initial);
        assert_eq!(record.is_ambiguous(), None);
        assert!(record.ambiguity_kinds().is_empty());
        assert_eq!(record.clarification_attempts(), 0);
        assert!(record.check_invariants().is_ok());
    }

    #[test]
    fn final_output_passes_clear_queries_through() {
        let mut record = QueryRecord::new("What is 2 + 2?");
        assert_eq!(record.final_output(), "What is 2 + 2?");
        record.begin_detection().unwrap();
        record.record_detection(false).unwrap();
        record.complete_unambiguous().unwrap();
        assert_eq!(record.status(), QueryStatus::Completed);
        assert_eq!(record.final_output(), "What is 2 + 2?");
    }

    #[test]
    fn final_output_prefers_confirmed_then_reformulated() {
        let mut record = awaiting_confirmation();
        assert_eq!(record.final_output(), "Where does the Nile River originate?");
        record
            .confirm(false, Some("Where is Lake Victoria?".to_string()))
            .unwrap();
        assert_eq!(record.final_output(), "Where is Lake Victoria?");
    }

    #[test]
    fn final_output_falls_back_to_original_for_unresolved_ambiguity() {
        let record = awaiting_clarification();
        assert_eq!(record.final_output(), "Tell me about the source of Nile.");
    }

    #[test]
    fn submit_counts_attempts() {
        let mut record = awaiting_clarification();
        record.submit_clarification("rivers".to_string()).unwrap();
        assert_eq!(record.clarification_attempts(), 1);
        assert_eq!(record.status(), QueryStatus::ClarificationReceived);
    }

    #[test]
    fn invalid_validation_then_retry_rewrites_question() {
        let mut record = awaiting_clarification();
        record.submit_clarification("maybe".to_string()).unwrap();
        record.begin_validation().unwrap();
        record
            .record_validation(false, "the answer does not pick a meaning".to_string())
            .unwrap();
        assert_eq!(record.status(), QueryStatus::ClarificationInvalid);

        record.request_retry().unwrap();
        assert_eq!(record.status(), QueryStatus::AwaitingClarification);
        assert_eq!(
            record.clarifying_question(),
            Some(
                "geography or informational sources?\n\n(Your previous answer was unclear: \
                 the answer does not pick a meaning. Please try again.)"
            )
        );
    }

    #[test]
    fn validation_outside_validating_state_is_rejected() {
        let mut record = awaiting_clarification();
        let err = record.record_validation(true, "ok".to_string()).unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidTransition { .. }));
        assert_eq!(record.clarification_is_valid(), None);
    }

    #[test]
    fn confirm_accepted_copies_reformulation() {
        let mut record = awaiting_confirmation();
        record.confirm(true, None).unwrap();
        assert_eq!(record.status(), QueryStatus::Completed);
        assert_eq!(
            record.confirmed_query(),
            Some("Where does the Nile River originate?")
        );
    }

    #[test]
    fn confirm_rejected_without_alternative_is_missing_alternative() {
        let mut record = awaiting_confirmation();
        let err = record.confirm(false, None).unwrap_err();
        assert_eq!(err, ResolutionError::MissingAlternative);
        assert_eq!(record.status(), QueryStatus::AwaitingConfirmation);

        let err = record.confirm(false, Some("   ".to_string())).unwrap_err();
        assert_eq!(err, ResolutionError::MissingAlternative);
    }

    #[test]
    fn confirm_requires_awaiting_confirmation() {
        let mut record = awaiting_clarification();
        let err = record.confirm(true, None).unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidTransition { .. }));
    }

    #[test]
    fn fail_sets_error_fields_once() {
        let mut record = awaiting_clarification();
        assert!(record.fail(&ResolutionError::generation("boom")));
        assert_eq!(record.status(), QueryStatus::Error);
        assert_eq!(record.error_message(), Some("boom"));
        assert_eq!(record.error_kind(), Some(FailureKind::GenerationError));

        assert!(!record.fail(&ResolutionError::MissingAlternative));
        assert_eq!(record.error_message(), Some("boom"));
        assert!(record.check_invariants().is_ok());
    }

    #[test]
    fn fail_is_a_no_op_on_completed_records() {
        let mut record = awaiting_confirmation();
        record.confirm(true, None).unwrap();
        assert!(!record.fail(&ResolutionError::generation("late")));
        assert_eq!(record.status(), QueryStatus::Completed);
        assert_eq!(record.error_message(), None);
    }

    #[test]
    fn out_of_order_transition_is_rejected() {
        let mut record = QueryRecord::new("q");
        let err = record.record_detection(true).unwrap_err();
        assert_eq!(
            err,
            ResolutionError::InvalidTransition {
                from: QueryStatus::Initial,
                to: QueryStatus::Ambiguous,
            }
        );
        assert_eq!(record.is_ambiguous(), None);
    }

    #[test]
    fn invariants_hold_along_the_happy_path() {
        assert!(awaiting_clarification().check_invariants().is_ok());
        assert!(awaiting_confirmation().check_invariants().is_ok());
    }
}
