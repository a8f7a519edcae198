//! Server-side error types: handler failures and config load errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Error raised inside an endpoint handler.
///
/// The instrumentation layer never swallows these: the response carries the
/// framework 500 and an [`ErrorKind`] extension so the middleware can label
/// `app_error_count_total` without inspecting the body.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Deliberate failure from the `/error` endpoint.
    #[error("synthetic failure: {0}")]
    Synthetic(String),
}

impl HandlerError {
    /// Stable kind string used as the `error_type` metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::Synthetic(_) => "Synthetic",
        }
    }
}

/// Response extension marking that the response came from a raised handler
/// error (as opposed to a normally returned status).
#[derive(Debug, Clone, Copy)]
pub struct ErrorKind(pub &'static str);

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        tracing::error!(kind, error = %self, "handler raised");
        let body = Json(json!({ "error": kind, "msg": self.to_string() }));
        let mut res = (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
        res.extensions_mut().insert(ErrorKind(kind));
        res
    }
}

/// Config load/validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config failed: {0}")]
    Io(String),
    #[error("invalid yaml: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
}
