//! HTTP surface: `/diagnose`, `/veterinary-details`, `/health` and the
//! static front-end.

mod error;
mod extractors;
mod handlers;
mod middleware;
mod router;
mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::{AppState, SharedState};

use anyhow::{Context, Result};
use std::path::Path;
use tokio::net::TcpListener;

use crate::service::DiagnosisService;

/// Bind and serve until Ctrl-C.
pub async fn serve(host: &str, port: u16, static_dir: &Path, service: DiagnosisService) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let app = build_router(AppState::shared(service), static_dir);
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
