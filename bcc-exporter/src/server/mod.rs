//! HTTP front end
//!
//! - `GET /debug/pprof/profile?pid=&seconds=[&test=true]`
//! - `GET /debug/folded/profile?pid=&seconds=[&test=true]`
//!
//! Optional basic auth wraps both routes; every request is logged.

pub mod auth;
pub mod middleware;
pub mod routes;

use anyhow::{Context, Result};
use axum::Router;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::ExporterConfig;
use crate::profiling::Profiler;

pub use routes::{create_router, AppState, FOLDED_ROUTE, PPROF_ROUTE};

/// Router for a configuration, using `/proc` and `$PATH`.
pub fn create_app(config: &ExporterConfig) -> Router {
    let profiler = Arc::new(Profiler::new(&config.profiler));
    create_router(profiler, config.password.as_deref())
}

/// Bind and serve until Ctrl+C.
///
/// # Errors
/// Returns an error if the listen address cannot be bound or the server fails.
pub async fn serve(config: ExporterConfig) -> Result<()> {
    let app = create_app(&config);

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to listen on {}", config.listen))?;
    info!("Listening on {}...", listener.local_addr()?);
    if config.password.is_some() {
        info!("Basic authentication enabled");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
}
