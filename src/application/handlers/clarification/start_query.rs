//! StartQueryHandler - Command handler for submitting a new query.

use std::sync::Arc;

use crate::application::machine::ResolutionMachine;

use super::outcome::{ClarificationCommandError, ResolutionOutcome};

/// Command to resolve a new query.
#[derive(Debug, Clone)]
pub struct StartQueryCommand {
    pub text: String,
}

/// Handler for new queries.
pub struct StartQueryHandler {
    machine: Arc<ResolutionMachine>,
}

impl StartQueryHandler {
    pub fn new(machine: Arc<ResolutionMachine>) -> Self {
        Self { machine }
    }

    pub async fn handle(
        &self,
        cmd: StartQueryCommand,
    ) -> Result<ResolutionOutcome, ClarificationCommandError> {
        if cmd.text.trim().is_empty() {
            return Err(ClarificationCommandError::EmptyQuery);
        }
        let record = self.machine.start(cmd.text).await;
        ResolutionOutcome::from_record(record).map_err(ClarificationCommandError::Encoding)
    }
}
