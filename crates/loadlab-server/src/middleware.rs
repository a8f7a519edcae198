//! Request instrumentation layer.
//!
//! Wraps every instrumented route uniformly; handlers stay unaware of
//! metrics. Per invocation:
//! 1. increment `app_active_requests`
//! 2. record the start instant
//! 3. run the inner handler
//! 4. completed response: count it under (method, endpoint, http_status)
//! 5. raised handler error (detected via the [`ErrorKind`] response
//!    extension): count it under (error_type, endpoint); the error response
//!    passes through unchanged
//! 6. always afterwards: observe latency, then decrement the active gauge
//!    last, on every exit path.
//!
//! Raised errors are counted instead of, not in addition to, the request
//! counter. The layer is purely observational: no retries, no suppression.

use std::time::Instant;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::app_state::AppState;
use crate::error::ErrorKind;

/// Map a request path to its stable endpoint identifier (the handler name).
/// Unmatched paths collapse to "unknown" to cap label cardinality.
pub fn endpoint_name(path: &str) -> &'static str {
    match path.trim_end_matches('/') {
        "" => "homepage",
        "/slow" => "slow_request",
        "/error" => "error_endpoint",
        "/cpu-intensive" => "cpu_intensive",
        _ => "unknown",
    }
}

pub async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let endpoint = endpoint_name(request.uri().path());
    let metrics = state.metrics();

    metrics.active_inc();
    let start = Instant::now();

    let response = next.run(request).await;

    match response.extensions().get::<ErrorKind>() {
        Some(kind) => metrics.record_error(kind.0, endpoint),
        None => metrics.record_request(&method, endpoint, response.status().as_u16()),
    }
    metrics.observe_latency(&method, endpoint, start.elapsed());
    metrics.active_dec();

    response
}

#[cfg(test)]
mod tests {
    use super::endpoint_name;

    #[test]
    fn endpoint_names_match_handlers() {
        assert_eq!(endpoint_name("/"), "homepage");
        assert_eq!(endpoint_name("/slow"), "slow_request");
        assert_eq!(endpoint_name("/error"), "error_endpoint");
        assert_eq!(endpoint_name("/cpu-intensive"), "cpu_intensive");
        assert_eq!(endpoint_name("/slow/"), "slow_request");
        assert_eq!(endpoint_name("/nope"), "unknown");
    }
}
