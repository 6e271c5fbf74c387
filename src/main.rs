//! clarigen - HTTP server for ambiguous query resolution.
//!
//! Reads configuration from `CLARIGEN__*` environment variables (and `.env`).

use std::process::ExitCode;
use std::sync::Arc;

use clarigen::adapters::http::{app_router, ClarificationHandlers};
use clarigen::bootstrap;
use clarigen::config::AppConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("clarigen: {e}");
            return ExitCode::FAILURE;
        }
    };

    bootstrap::init_tracing(&config.server);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let machine = Arc::new(bootstrap::build_machine(&config)?);
    let app = app_router(
        ClarificationHandlers::from_machine(machine),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "clarigen listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
