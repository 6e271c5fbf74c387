//! Application layer - the resolution machine and its command handlers.
//!
//! The machine drives query records through the pipeline; the handlers wrap
//! it for the stateless resume protocol used by the HTTP surface.

pub mod answer_source;
pub mod batch;
pub mod handlers;
pub mod machine;

pub use answer_source::{AnswerChannel, AnswerSource, ChannelAnswerSource};
pub use batch::BatchRunner;
pub use machine::{ResolutionMachine, ResolutionSettings, ResumeError};
