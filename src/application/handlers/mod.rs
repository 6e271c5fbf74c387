//! Application handlers.
//!
//! Command handlers that orchestrate the resolution machine.

pub mod clarification;

pub use clarification::{
    ClarificationCommandError, ConfirmReformulationCommand, ConfirmReformulationHandler,
    NextAction, ResolutionOutcome, StartQueryCommand, StartQueryHandler,
    SubmitClarificationCommand, SubmitClarificationHandler,
};
