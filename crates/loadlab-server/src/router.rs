//! Axum router wiring.
//!
//! The four synthetic endpoints sit behind the instrumentation layer;
//! `/metrics` is added outside it so scraping never shows up in its own
//! numbers.

use axum::{middleware::from_fn_with_state, routing::get, Router};

use crate::{app_state::AppState, handlers, middleware};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::homepage))
        .route("/slow", get(handlers::slow_request))
        .route("/error", get(handlers::error_endpoint))
        .route("/cpu-intensive", get(handlers::cpu_intensive))
        .route_layer(from_fn_with_state(state.clone(), middleware::track_requests))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
}
