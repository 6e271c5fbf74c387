//! Domain layer - pure business logic with no I/O.

pub mod clarification;
pub mod foundation;
