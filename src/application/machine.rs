//! ResolutionMachine - drives query records through detection,
//! clarification, validation, reformulation and confirmation.
//!
//! The machine owns no per-query state. Every operation takes the record it
//! works on, so one machine can serve any number of independent records in
//! parallel as long as each record is only touched by one call at a time.
//!
//! Failures never escape as errors: they are written onto the record
//! (`status = ERROR`, `error_message`, `error_kind`) and the record is handed
//! back. The only `Err` results are [`ResumeError`]s, raised when a caller
//! presents a blob that cannot be resumed at all.

use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::domain::clarification::{
    parse_kinds, AfterReformulation, BlobError, QueryRecord, QueryStatus, ResolutionError,
    ResumeBlob,
};
use crate::ports::{ClarificationExchange, Detector, Resolver};

use super::answer_source::AnswerSource;

/// Policy knobs of the machine, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionSettings {
    /// Answers accepted (valid or not) before the query fails.
    pub max_clarification_attempts: u32,
    /// Whether each answer is judged before reformulation.
    pub validate_clarifications: bool,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            max_clarification_attempts: 3,
            validate_clarifications: true,
        }
    }
}

impl From<&PipelineConfig> for ResolutionSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            max_clarification_attempts: config.max_clarification_attempts.max(1),
            validate_clarifications: config.validate_clarifications,
        }
    }
}

/// A blob that cannot be resumed. The blob itself is left untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResumeError {
    #[error(transparent)]
    MalformedBlob(#[from] BlobError),

    #[error("Query is {actual}, expected {expected}")]
    UnexpectedStatus {
        expected: QueryStatus,
        actual: QueryStatus,
    },
}

/// The resolution state machine.
pub struct ResolutionMachine {
    detector: Arc<dyn Detector>,
    resolver: Arc<dyn Resolver>,
    settings: ResolutionSettings,
}

impl ResolutionMachine {
    pub fn new(
        detector: Arc<dyn Detector>,
        resolver: Arc<dyn Resolver>,
        settings: ResolutionSettings,
    ) -> Self {
        Self {
            detector,
            resolver,
            settings,
        }
    }

    pub fn settings(&self) -> ResolutionSettings {
        self.settings
    }

    pub fn detector(&self) -> &Arc<dyn Detector> {
        &self.detector
    }

    pub fn resolver(&self) -> &Arc<dyn Resolver> {
        &self.resolver
    }

    // ════════════════════════════════════════════════════════════════════
    // Entry points
    // ════════════════════════════════════════════════════════════════════

    /// Detects ambiguity and, if needed, asks the first clarifying question.
    ///
    /// Returns a record that is `COMPLETED` (clear query), paused in
    /// `AWAITING_CLARIFICATION`, or `ERROR`.
    pub async fn start(&self, query: impl Into<String>) -> QueryRecord {
        let mut record = QueryRecord::new(query);
        tracing::info!(query_id = %record.query_id(), "Resolving query");
        let _ = self.begin(&mut record).await;
        record
    }

    /// Applies one clarification answer to a paused record blob.
    ///
    /// The result is paused again (`AWAITING_CLARIFICATION` after an invalid
    /// answer, `AWAITING_CONFIRMATION` after reformulation) or `ERROR`.
    pub async fn resume_with_clarification(
        &self,
        blob: &ResumeBlob,
        answer: impl Into<String>,
    ) -> Result<QueryRecord, ResumeError> {
        let mut record = restore(blob, QueryStatus::AwaitingClarification)?;
        let _ = self
            .answer_clarification(&mut record, answer.into(), AfterReformulation::AwaitConfirmation)
            .await;
        Ok(record)
    }

    /// Accepts or replaces the reformulation of a paused record blob.
    pub async fn resume_with_confirmation(
        &self,
        blob: &ResumeBlob,
        accepted: bool,
        alternative: Option<String>,
    ) -> Result<QueryRecord, ResumeError> {
        let mut record = restore(blob, QueryStatus::AwaitingConfirmation)?;
        let _ = self.confirm(&mut record, accepted, alternative);
        Ok(record)
    }

    /// Resolves a query in one call, pulling answers from `source` until
    /// the record is `COMPLETED` or `ERROR`.
    ///
    /// The interactive flow has no confirmation step: the reformulation is
    /// the final output.
    pub async fn run_interactive<S>(&self, query: impl Into<String>, mut source: S) -> QueryRecord
    where
        S: AnswerSource,
    {
        let mut record = self.start(query).await;
        while record.status() == QueryStatus::AwaitingClarification {
            let question = record.clarifying_question().unwrap_or_default().to_string();
            let Some(answer) = source.answer(&question).await else {
                self.fail(&mut record, ResolutionError::AnswerSourceClosed);
                break;
            };
            let _ = self
                .answer_clarification(&mut record, answer, AfterReformulation::Complete)
                .await;
        }
        record
    }

    // ════════════════════════════════════════════════════════════════════
    // Composite steps
    // ════════════════════════════════════════════════════════════════════

    /// INITIAL -> detection -> COMPLETED or AWAITING_CLARIFICATION.
    pub async fn begin(&self, record: &mut QueryRecord) -> Result<(), ResolutionError> {
        self.detect(record).await?;
        if record.status() == QueryStatus::NotAmbiguous {
            let outcome = record.complete_unambiguous();
            self.settle(record, outcome)?;
            tracing::info!(query_id = %record.query_id(), "Query is clear, passing through");
            return Ok(());
        }
        self.generate_clarification(record).await
    }

    /// Submits an answer, validates it (when enabled) and reformulates.
    ///
    /// An invalid answer under the attempt bound leaves the record in
    /// `AWAITING_CLARIFICATION` with the rewritten question.
    pub async fn answer_clarification(
        &self,
        record: &mut QueryRecord,
        answer: String,
        next: AfterReformulation,
    ) -> Result<(), ResolutionError> {
        self.submit_clarification(record, answer)?;
        if self.settings.validate_clarifications {
            self.validate(record).await?;
            if record.status() == QueryStatus::AwaitingClarification {
                return Ok(());
            }
        }
        self.reformulate(record, next).await
    }

    // ════════════════════════════════════════════════════════════════════
    // Single steps
    // ════════════════════════════════════════════════════════════════════

    /// Asks the detector whether the original query is ambiguous.
    pub async fn detect(&self, record: &mut QueryRecord) -> Result<(), ResolutionError> {
        let outcome = self.try_detect(record).await;
        self.settle(record, outcome)
    }

    async fn try_detect(&self, record: &mut QueryRecord) -> Result<(), ResolutionError> {
        record.begin_detection()?;
        let detection = self.detector.classify(record.original_query()).await?;
        record.record_detection(detection.is_ambiguous)?;
        tracing::info!(
            query_id = %record.query_id(),
            is_ambiguous = detection.is_ambiguous,
            "Ambiguity detected"
        );
        Ok(())
    }

    /// Asks the resolver to classify the ambiguity and phrase a question.
    pub async fn generate_clarification(
        &self,
        record: &mut QueryRecord,
    ) -> Result<(), ResolutionError> {
        let outcome = self.try_generate_clarification(record).await;
        self.settle(record, outcome)
    }

    async fn try_generate_clarification(
        &self,
        record: &mut QueryRecord,
    ) -> Result<(), ResolutionError> {
        expect_status(record, QueryStatus::Ambiguous, QueryStatus::AwaitingClarification)?;

        let draft = self
            .resolver
            .generate_clarification(record.original_query())
            .await?;

        let question = draft.question.trim();
        if question.is_empty() {
            return Err(ResolutionError::schema_violation(
                draft.question.clone(),
                "clarifying question is empty",
            ));
        }

        let kinds = match &draft.kinds {
            Some(raw) => parse_kinds(raw).map_err(|e| ResolutionError::from_taxonomy(raw, e))?,
            None => Vec::new(),
        };

        let question = question.to_string();
        record.record_clarification(kinds, draft.reasoning, question)?;
        tracing::info!(
            query_id = %record.query_id(),
            kinds = ?record.ambiguity_kinds(),
            "Clarifying question generated"
        );
        Ok(())
    }

    /// Records an answer and moves on to validation when it is enabled.
    pub fn submit_clarification(
        &self,
        record: &mut QueryRecord,
        answer: String,
    ) -> Result<(), ResolutionError> {
        let mut outcome = record.submit_clarification(answer);
        if outcome.is_ok() && self.settings.validate_clarifications {
            outcome = record.begin_validation();
        }
        self.settle(record, outcome)?;
        tracing::debug!(
            query_id = %record.query_id(),
            attempt = record.clarification_attempts(),
            "Clarification received"
        );
        Ok(())
    }

    /// Judges the latest answer. Exactly one resolver call per answer.
    pub async fn validate(&self, record: &mut QueryRecord) -> Result<(), ResolutionError> {
        let outcome = self.try_validate(record).await;
        self.settle(record, outcome)
    }

    async fn try_validate(&self, record: &mut QueryRecord) -> Result<(), ResolutionError> {
        expect_status(
            record,
            QueryStatus::ValidatingClarification,
            QueryStatus::ValidatingClarification,
        )?;

        let exchange = exchange_of(record);
        let verdict = self.resolver.validate(&exchange).await?;
        record.record_validation(verdict.is_valid, verdict.feedback)?;

        if verdict.is_valid {
            tracing::info!(query_id = %record.query_id(), "Clarification accepted");
            return Ok(());
        }

        let attempts = record.clarification_attempts();
        tracing::warn!(
            query_id = %record.query_id(),
            attempt = attempts,
            max_attempts = self.settings.max_clarification_attempts,
            feedback = record.clarification_validation_feedback().unwrap_or_default(),
            "Clarification rejected"
        );
        if attempts >= self.settings.max_clarification_attempts {
            return Err(ResolutionError::ExhaustedRetries { attempts });
        }
        record.request_retry()
    }

    /// Rewrites the query using the accepted answer.
    pub async fn reformulate(
        &self,
        record: &mut QueryRecord,
        next: AfterReformulation,
    ) -> Result<(), ResolutionError> {
        let outcome = self.try_reformulate(record, next).await;
        self.settle(record, outcome)
    }

    async fn try_reformulate(
        &self,
        record: &mut QueryRecord,
        next: AfterReformulation,
    ) -> Result<(), ResolutionError> {
        if record.status() == QueryStatus::ValidatingClarification
            && record.clarification_is_valid() != Some(true)
        {
            return Err(ResolutionError::InvalidTransition {
                from: record.status(),
                to: QueryStatus::Reformulating,
            });
        }
        record.begin_reformulation()?;

        let exchange = exchange_of(record);
        let reformulated = self.resolver.reformulate(&exchange).await?;
        if reformulated.trim().is_empty() {
            return Err(ResolutionError::schema_violation(
                reformulated,
                "reformulated query is empty",
            ));
        }

        record.record_reformulation(reformulated, next)?;
        tracing::info!(
            query_id = %record.query_id(),
            status = %record.status(),
            "Query reformulated"
        );
        Ok(())
    }

    /// Finalizes a reformulation, or replaces it with the caller's own text.
    pub fn confirm(
        &self,
        record: &mut QueryRecord,
        accepted: bool,
        alternative: Option<String>,
    ) -> Result<(), ResolutionError> {
        let outcome = record.confirm(accepted, alternative);
        self.settle(record, outcome)?;
        tracing::info!(query_id = %record.query_id(), accepted, "Query confirmed");
        Ok(())
    }

    // ════════════════════════════════════════════════════════════════════
    // Failure handling
    // ════════════════════════════════════════════════════════════════════

    fn settle(
        &self,
        record: &mut QueryRecord,
        outcome: Result<(), ResolutionError>,
    ) -> Result<(), ResolutionError> {
        outcome.map_err(|err| self.fail(record, err))
    }

    fn fail(&self, record: &mut QueryRecord, err: ResolutionError) -> ResolutionError {
        if record.fail(&err) {
            tracing::error!(
                query_id = %record.query_id(),
                kind = %err.kind(),
                "Resolution failed: {}",
                err
            );
        } else {
            tracing::warn!(
                query_id = %record.query_id(),
                status = %record.status(),
                "Ignoring failure on terminal record: {}",
                err
            );
        }
        err
    }
}

fn restore(blob: &ResumeBlob, expected: QueryStatus) -> Result<QueryRecord, ResumeError> {
    let record = QueryRecord::from_blob(blob)?;
    if record.status() != expected {
        return Err(ResumeError::UnexpectedStatus {
            expected,
            actual: record.status(),
        });
    }
    Ok(record)
}

fn expect_status(
    record: &QueryRecord,
    expected: QueryStatus,
    to: QueryStatus,
) -> Result<(), ResolutionError> {
    if record.status() == expected {
        Ok(())
    } else {
        Err(ResolutionError::InvalidTransition {
            from: record.status(),
            to,
        })
    }
}

fn exchange_of(record: &QueryRecord) -> ClarificationExchange {
    ClarificationExchange {
        query: record.original_query().to_string(),
        kinds: record.ambiguity_kinds().to_vec(),
        question: record.clarifying_question().unwrap_or_default().to_string(),
        answer: record.user_clarification().unwrap_or_default().to_string(),
    }
}
