//! Route table and handlers

use axum::extract::{Query, State};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use super::auth::{require_basic_auth, BasicAuth};
use super::middleware::log_requests;
use crate::domain::{ProfileFormat, ProfileQuery};
use crate::export::stream_artifact;
use crate::profiling::Profiler;

pub const PPROF_ROUTE: &str = "/debug/pprof/profile";
pub const FOLDED_ROUTE: &str = "/debug/folded/profile";

#[derive(Clone)]
pub struct AppState {
    pub profiler: Arc<Profiler>,
}

/// Build the router; basic auth is enabled when `password` is set.
pub fn create_router(profiler: Arc<Profiler>, password: Option<&str>) -> Router {
    let mut router = Router::new()
        .route(PPROF_ROUTE, get(pprof_profile))
        .route(FOLDED_ROUTE, get(folded_profile))
        .with_state(AppState { profiler });

    if let Some(password) = password {
        router = router.layer(from_fn_with_state(BasicAuth::new(password), require_basic_auth));
    }

    router.layer(from_fn(log_requests))
}

async fn pprof_profile(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Response {
    run_profile(&state, ProfileFormat::Pprof, &query).await
}

async fn folded_profile(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Response {
    run_profile(&state, ProfileFormat::Folded, &query).await
}

async fn run_profile(state: &AppState, format: ProfileFormat, query: &ProfileQuery) -> Response {
    match state.profiler.run(format, query).await {
        Ok(produced) => stream_artifact(produced).await,
        Err(e) => e.into_response(),
    }
}
