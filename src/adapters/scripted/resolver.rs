//! Scripted Resolver for tests and demos.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ports::{
    ClarificationDraft, ClarificationExchange, PortError, Resolver, ValidationVerdict,
};

/// One recorded resolver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverCall {
    GenerateClarification { query: String },
    Validate(ClarificationExchange),
    Reformulate(ClarificationExchange),
}

/// Resolver that replays a separate queue per operation.
///
/// An operation with an empty queue fails with a generation error, which
/// makes unexpected calls visible as `ERROR` records in tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedResolver {
    clarifications: Arc<Mutex<VecDeque<Result<ClarificationDraft, PortError>>>>,
    validations: Arc<Mutex<VecDeque<Result<ValidationVerdict, PortError>>>>,
    reformulations: Arc<Mutex<VecDeque<Result<String, PortError>>>>,
    calls: Arc<Mutex<Vec<ResolverCall>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn exhausted(operation: &str) -> PortError {
    PortError::generation(format!(
        "scripted resolver has no {} response queued",
        operation
    ))
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_clarification(self, draft: ClarificationDraft) -> Self {
        lock(&self.clarifications).push_back(Ok(draft));
        self
    }

    /// Queues a classified clarification built from raw kind tags.
    pub fn then_question(self, kinds: &[&str], question: impl Into<String>) -> Self {
        self.then_clarification(ClarificationDraft {
            kinds: Some(kinds.iter().map(|k| k.to_string()).collect()),
            reasoning: None,
            question: question.into(),
        })
    }

    pub fn then_clarification_error(self, error: PortError) -> Self {
        lock(&self.clarifications).push_back(Err(error));
        self
    }

    pub fn then_valid(self, feedback: impl Into<String>) -> Self {
        lock(&self.validations).push_back(Ok(ValidationVerdict::valid(feedback)));
        self
    }

    pub fn then_invalid(self, feedback: impl Into<String>) -> Self {
        lock(&self.validations).push_back(Ok(ValidationVerdict::invalid(feedback)));
        self
    }

    pub fn then_validation_error(self, error: PortError) -> Self {
        lock(&self.validations).push_back(Err(error));
        self
    }

    pub fn then_reformulation(self, text: impl Into<String>) -> Self {
        lock(&self.reformulations).push_back(Ok(text.into()));
        self
    }

    pub fn then_reformulation_error(self, error: PortError) -> Self {
        lock(&self.reformulations).push_back(Err(error));
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<ResolverCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn validation_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| matches!(call, ResolverCall::Validate(_)))
            .count()
    }

    pub fn reformulation_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| matches!(call, ResolverCall::Reformulate(_)))
            .count()
    }
}

#[async_trait]
impl Resolver for ScriptedResolver {
    async fn generate_clarification(&self, query: &str) -> Result<ClarificationDraft, PortError> {
        lock(&self.calls).push(ResolverCall::GenerateClarification {
            query: query.to_string(),
        });
        lock(&self.clarifications)
            .pop_front()
            .unwrap_or_else(|| Err(exhausted("clarification")))
    }

    async fn validate(
        &self,
        exchange: &ClarificationExchange,
    ) -> Result<ValidationVerdict, PortError> {
        lock(&self.calls).push(ResolverCall::Validate(exchange.clone()));
        lock(&self.validations)
            .pop_front()
            .unwrap_or_else(|| Err(exhausted("validation")))
    }

    async fn reformulate(&self, exchange: &ClarificationExchange) -> Result<String, PortError> {
        lock(&self.calls).push(ResolverCall::Reformulate(exchange.clone()));
        lock(&self.reformulations)
            .pop_front()
            .unwrap_or_else(|| Err(exhausted("reformulation")))
    }
}
