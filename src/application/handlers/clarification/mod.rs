//! Clarification command handlers.

mod confirm_reformulation;
mod outcome;
mod start_query;
mod submit_clarification;

pub use confirm_reformulation::{ConfirmReformulationCommand, ConfirmReformulationHandler};
pub use outcome::{ClarificationCommandError, NextAction, ResolutionOutcome};
pub use start_query::{StartQueryCommand, StartQueryHandler};
pub use submit_clarification::{SubmitClarificationCommand, SubmitClarificationHandler};
