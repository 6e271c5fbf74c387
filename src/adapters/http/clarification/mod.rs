//! HTTP adapter for the clarification flow.
//!
//! Stateless: every paused query travels to the client as a `context` blob
//! and comes back with the next request.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ClarifyRequest, ComponentHealth, ConfirmRequest, ErrorResponse, HealthResponse, QueryRequest,
    QueryResponse, ResponseStatus,
};
pub use handlers::ClarificationHandlers;
pub use routes::{app_router, clarification_routes};
