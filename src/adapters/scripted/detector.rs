//! Scripted Detector for tests and demos.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::ports::{Detection, Detector, PortError};

/// Detector that replays queued answers and records every query it sees.
///
/// Answers registered for a specific query text take precedence over the
/// queue. A call with nothing to replay fails with a generation error.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDetector {
    queue: Arc<Mutex<VecDeque<Result<Detection, PortError>>>>,
    by_query: Arc<Mutex<HashMap<String, Result<Detection, PortError>>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a "clear" verdict.
    pub fn then_clear(self) -> Self {
        self.then(Ok(Detection { is_ambiguous: false }))
    }

    /// Queues an "ambiguous" verdict.
    pub fn then_ambiguous(self) -> Self {
        self.then(Ok(Detection { is_ambiguous: true }))
    }

    /// Queues a failure.
    pub fn then_error(self, error: PortError) -> Self {
        self.then(Err(error))
    }

    pub fn then(self, response: Result<Detection, PortError>) -> Self {
        lock(&self.queue).push_back(response);
        self
    }

    /// Answers `query` with `is_ambiguous` every time it is asked.
    pub fn on_query(self, query: impl Into<String>, is_ambiguous: bool) -> Self {
        lock(&self.by_query).insert(query.into(), Ok(Detection { is_ambiguous }));
        self
    }

    /// Delays the answer for `query`.
    pub fn with_delay_for(self, query: impl Into<String>, delay: Duration) -> Self {
        lock(&self.delays).insert(query.into(), delay);
        self
    }

    /// Queries classified so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl Detector for ScriptedDetector {
    async fn classify(&self, query: &str) -> Result<Detection, PortError> {
        lock(&self.calls).push(query.to_string());

        let delay = lock(&self.delays).get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let keyed = lock(&self.by_query).get(query).cloned();
        match keyed {
            Some(response) => response,
            None => lock(&self.queue).pop_front().unwrap_or_else(|| {
                Err(PortError::generation(
                    "scripted detector has no response queued",
                ))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_queue_then_fails() {
        let detector = ScriptedDetector::new().then_ambiguous().then_clear();
        assert!(detector.classify("a").await.unwrap().is_ambiguous);
        assert!(!detector.classify("b").await.unwrap().is_ambiguous);
        assert!(matches!(
            detector.classify("c").await,
            Err(PortError::Generation(_))
        ));
        assert_eq!(detector.calls(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn keyed_answers_win_and_repeat() {
        let detector = ScriptedDetector::new().on_query("x", true).then_clear();
        assert!(detector.classify("x").await.unwrap().is_ambiguous);
        assert!(detector.classify("x").await.unwrap().is_ambiguous);
        assert!(!detector.classify("y").await.unwrap().is_ambiguous);
    }
}
