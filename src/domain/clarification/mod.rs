//! Clarification module - ambiguity taxonomy, query records and their
//! lifecycle.
//!
//! Everything here is pure: no I/O, no async. The application layer drives
//! records through the transition methods using the capability ports.

mod ambiguity;
mod blob;
mod errors;
mod record;
mod status;
mod strategy;

pub use ambiguity::{
    check_kind_set, format_definitions, join_kinds, parse_kinds, AmbiguityKind, TaxonomyError,
};
pub use blob::{BlobError, ResumeBlob};
pub use errors::{FailureKind, ResolutionError};
pub use record::{AfterReformulation, QueryRecord};
pub use status::QueryStatus;
pub use strategy::ClarificationStrategy;
