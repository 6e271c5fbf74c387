//! BatchRunner - resolves many independent queries concurrently.

use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::domain::clarification::QueryRecord;

use super::machine::ResolutionMachine;

/// Runs `start` over a list of queries with a bounded number in flight.
///
/// Records come back in input order regardless of completion order.
pub struct BatchRunner {
    machine: Arc<ResolutionMachine>,
    concurrency: usize,
}

impl BatchRunner {
    pub fn new(machine: Arc<ResolutionMachine>, concurrency: usize) -> Self {
        Self {
            machine,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub async fn run<I, Q>(&self, queries: I) -> Vec<QueryRecord>
    where
        I: IntoIterator<Item = Q>,
        Q: Into<String>,
    {
        let queries: Vec<String> = queries.into_iter().map(Into::into).collect();
        tracing::info!(
            count = queries.len(),
            concurrency = self.concurrency,
            "Starting batch resolution"
        );

        let mut results: Vec<(usize, QueryRecord)> = stream::iter(queries.into_iter().enumerate())
            .map(|(index, query)| {
                let machine = Arc::clone(&self.machine);
                async move { (index, machine.start(query).await) }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, record)| record).collect()
    }
}
