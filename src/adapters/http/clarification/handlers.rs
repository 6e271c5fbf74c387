//! HTTP handlers for the clarification endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::clarification::{
    ClarificationCommandError, ConfirmReformulationCommand, ConfirmReformulationHandler,
    ResolutionOutcome, StartQueryCommand, StartQueryHandler, SubmitClarificationCommand,
    SubmitClarificationHandler,
};
use crate::application::machine::{ResolutionMachine, ResumeError};

use super::dto::{
    ClarifyRequest, ComponentHealth, ConfirmRequest, ErrorResponse, HealthResponse,
    QueryRequest, QueryResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ClarificationHandlers {
    start_handler: Arc<StartQueryHandler>,
    clarify_handler: Arc<SubmitClarificationHandler>,
    confirm_handler: Arc<ConfirmReformulationHandler>,
    machine: Arc<ResolutionMachine>,
}

impl ClarificationHandlers {
    pub fn new(
        start_handler: Arc<StartQueryHandler>,
        clarify_handler: Arc<SubmitClarificationHandler>,
        confirm_handler: Arc<ConfirmReformulationHandler>,
        machine: Arc<ResolutionMachine>,
    ) -> Self {
        Self {
            start_handler,
            clarify_handler,
            confirm_handler,
            machine,
        }
    }

    /// Wires every command handler onto one shared machine.
    pub fn from_machine(machine: Arc<ResolutionMachine>) -> Self {
        Self::new(
            Arc::new(StartQueryHandler::new(Arc::clone(&machine))),
            Arc::new(SubmitClarificationHandler::new(Arc::clone(&machine))),
            Arc::new(ConfirmReformulationHandler::new(Arc::clone(&machine))),
            machine,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /v1/query - Resolve a new query
pub async fn submit_query(
    State(handlers): State<ClarificationHandlers>,
    Json(req): Json<QueryRequest>,
) -> Response {
    let cmd = StartQueryCommand { text: req.text };

    match handlers.start_handler.handle(cmd).await {
        Ok(outcome) => outcome_response(outcome),
        Err(e) => handle_command_error(e),
    }
}

/// POST /v1/clarify - Answer the pending clarifying question
pub async fn submit_clarification(
    State(handlers): State<ClarificationHandlers>,
    Json(req): Json<ClarifyRequest>,
) -> Response {
    let cmd = SubmitClarificationCommand {
        blob: req.context,
        answer: req.answer,
    };

    match handlers.clarify_handler.handle(cmd).await {
        Ok(outcome) => outcome_response(outcome),
        Err(e) => handle_command_error(e),
    }
}

/// POST /v1/confirm - Accept or replace the reformulated query
pub async fn confirm_reformulation(
    State(handlers): State<ClarificationHandlers>,
    Json(req): Json<ConfirmRequest>,
) -> Response {
    let cmd = ConfirmReformulationCommand {
        blob: req.context,
        accepted: req.confirmation,
        alternative: req.alternative_query,
    };

    match handlers.confirm_handler.handle(cmd).await {
        Ok(outcome) => outcome_response(outcome),
        Err(e) => handle_command_error(e),
    }
}

/// GET /health - Report connectivity of both model tiers
pub async fn health(State(handlers): State<ClarificationHandlers>) -> Response {
    let (detector, resolver) = tokio::join!(
        handlers.machine.detector().check_connection(),
        handlers.machine.resolver().check_connection(),
    );
    let response = HealthResponse::new(
        ComponentHealth::from_check(detector),
        ComponentHealth::from_check(resolver),
    );
    (StatusCode::OK, Json(response)).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Response mapping
// ════════════════════════════════════════════════════════════════════════════

fn outcome_response(outcome: ResolutionOutcome) -> Response {
    if outcome.is_failed() {
        tracing::error!(
            query_id = %outcome.record.query_id(),
            error = outcome.record.error_message().unwrap_or_default(),
            "Query resolution failed"
        );
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::resolution_failed(&outcome.record)),
        )
            .into_response();
    }
    (StatusCode::OK, Json(QueryResponse::from_outcome(outcome))).into_response()
}

fn handle_command_error(error: ClarificationCommandError) -> Response {
    match error {
        ClarificationCommandError::EmptyQuery => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(error.to_string())),
        )
            .into_response(),
        ClarificationCommandError::Resume(ResumeError::MalformedBlob(ref e)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.to_string())),
        )
            .into_response(),
        ClarificationCommandError::Resume(ResumeError::UnexpectedStatus { .. }) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::conflict(error.to_string())),
        )
            .into_response(),
        ClarificationCommandError::Encoding(ref e) => {
            tracing::error!(error = %e, "Failed to encode resume blob");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(error.to_string())),
            )
                .into_response()
        }
    }
}
