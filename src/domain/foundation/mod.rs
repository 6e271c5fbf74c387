//! Foundation module - Shared domain primitives.
//!
//! Value objects, identifiers and the state machine vocabulary used by
//! the clarification domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::QueryId;
pub use state_machine::{StateMachine, TransitionError};
pub use timestamp::Timestamp;
