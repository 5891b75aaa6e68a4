//! Request logging

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{error, info, warn};
use std::time::Instant;

/// Log method, URI, status and latency of every request.
///
/// Latency covers the handler only; streamed bodies may still be in flight.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis();
    if status.is_server_error() {
        error!("{method} {uri} -> {} ({elapsed_ms} ms)", status.as_u16());
    } else if status.is_client_error() {
        warn!("{method} {uri} -> {} ({elapsed_ms} ms)", status.as_u16());
    } else {
        info!("{method} {uri} -> {} ({elapsed_ms} ms)", status.as_u16());
    }
    response
}
