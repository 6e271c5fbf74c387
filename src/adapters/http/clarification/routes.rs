//! HTTP routes for the clarification endpoints.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::handlers::{
    confirm_reformulation, health, submit_clarification, submit_query, ClarificationHandlers,
};

/// Creates the clarification router with all endpoints.
pub fn clarification_routes(handlers: ClarificationHandlers) -> Router {
    Router::new()
        .route("/v1/query", post(submit_query))
        .route("/v1/clarify", post(submit_clarification))
        .route("/v1/confirm", post(confirm_reformulation))
        .route("/health", get(health))
        .with_state(handlers)
}

/// The served application: routes plus request tracing, CORS and a
/// per-request timeout.
pub fn app_router(handlers: ClarificationHandlers, request_timeout: Duration) -> Router {
    clarification_routes(handlers).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(TimeoutLayer::new(request_timeout)),
    )
}
