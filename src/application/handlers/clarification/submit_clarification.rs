//! SubmitClarificationHandler - Command handler for answering a clarifying
//! question on a paused query.

use std::sync::Arc;

use crate::application::machine::ResolutionMachine;
use crate::domain::clarification::ResumeBlob;

use super::outcome::{ClarificationCommandError, ResolutionOutcome};

/// Command carrying the user's answer and the blob it applies to.
#[derive(Debug, Clone)]
pub struct SubmitClarificationCommand {
    pub blob: ResumeBlob,
    pub answer: String,
}

/// Handler for clarification answers.
pub struct SubmitClarificationHandler {
    machine: Arc<ResolutionMachine>,
}

impl SubmitClarificationHandler {
    pub fn new(machine: Arc<ResolutionMachine>) -> Self {
        Self { machine }
    }

    pub async fn handle(
        &self,
        cmd: SubmitClarificationCommand,
    ) -> Result<ResolutionOutcome, ClarificationCommandError> {
        let record = self
            .machine
            .resume_with_clarification(&cmd.blob, cmd.answer)
            .await?;
        ResolutionOutcome::from_record(record).map_err(ClarificationCommandError::Encoding)
    }
}
