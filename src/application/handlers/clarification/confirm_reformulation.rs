//! ConfirmReformulationHandler - Command handler for accepting or replacing
//! a reformulated query.

use std::sync::Arc;

use crate::application::machine::ResolutionMachine;
use crate::domain::clarification::ResumeBlob;

use super::outcome::{ClarificationCommandError, ResolutionOutcome};

/// Command carrying the confirmation decision.
#[derive(Debug, Clone)]
pub struct ConfirmReformulationCommand {
    pub blob: ResumeBlob,
    pub accepted: bool,
    pub alternative: Option<String>,
}

/// Handler for confirmations.
pub struct ConfirmReformulationHandler {
    machine: Arc<ResolutionMachine>,
}

impl ConfirmReformulationHandler {
    pub fn new(machine: Arc<ResolutionMachine>) -> Self {
        Self { machine }
    }

    pub async fn handle(
        &self,
        cmd: ConfirmReformulationCommand,
    ) -> Result<ResolutionOutcome, ClarificationCommandError> {
        let record = self
            .machine
            .resume_with_confirmation(&cmd.blob, cmd.accepted, cmd.alternative)
            .await?;
        ResolutionOutcome::from_record(record).map_err(ClarificationCommandError::Encoding)
    }
}
