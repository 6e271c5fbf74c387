//! HTTP adapters - REST API implementations.

pub mod clarification;

pub use clarification::{app_router, clarification_routes, ClarificationHandlers};
