//! Endpoint handlers.
//!
//! Each synthetic endpoint exercises one behavior class: fixed-latency
//! health, random delay, probabilistic failure, CPU burn. `/metrics` serves
//! the registry snapshot and is the only route outside the instrumentation
//! layer.

use std::time::Duration;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use rand::Rng;
use serde_json::{json, Value};

use loadlab_core::expose::TEXT_EXPOSITION_CONTENT_TYPE;

use crate::app_state::AppState;
use crate::error::HandlerError;
use crate::workload;

/// CPU budget for `/cpu-intensive`.
const CPU_BURN_BUDGET: Duration = Duration::from_millis(500);

/// `GET /` — health check.
pub async fn homepage() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// `GET /slow` — sleep a uniformly random 0.5–2.0 s, then complete.
pub async fn slow_request() -> Json<Value> {
    let delay = {
        let mut rng = rand::thread_rng();
        rng.gen_range(0.5..=2.0)
    };
    tokio::time::sleep(Duration::from_secs_f64(delay)).await;
    Json(json!({ "status": "completed" }))
}

/// `GET /error` — raise with probability 0.5, otherwise succeed.
pub async fn error_endpoint() -> Result<Json<Value>, HandlerError> {
    if rand::thread_rng().gen_bool(0.5) {
        return Err(HandlerError::Synthetic("random error occurred".into()));
    }
    Ok(Json(json!({ "status": "success" })))
}

/// `GET /cpu-intensive` — burn 0.5 s of wall clock, then complete.
pub async fn cpu_intensive() -> Json<Value> {
    workload::burn_cpu(CPU_BURN_BUDGET).await;
    Json(json!({ "status": "completed" }))
}

/// `GET /metrics` — exposition-format snapshot. Not instrumented.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.registry().snapshot().to_text();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, TEXT_EXPOSITION_CONTENT_TYPE)],
        body,
    )
}
