//! Application metric set.
//!
//! Registers the fixed loadlab metrics at startup and exposes typed recording
//! methods so handlers and middleware never touch raw metric names or label
//! schemas. Registration failures are startup errors; recording failures
//! cannot occur for the fixed schemas and are logged defensively rather than
//! propagated into the request path.

use std::sync::Arc;
use std::time::Duration;

use loadlab_core::{MetricDesc, MetricsError, Registry};

use crate::config::BuildSection;

/// Latency buckets in seconds.
pub const LATENCY_BUCKETS: &[f64] = &[0.1, 0.5, 1.0, 2.0, 5.0];

pub const REQUEST_COUNT: &str = "app_request_count_total";
pub const REQUEST_LATENCY: &str = "app_request_latency_seconds";
pub const ACTIVE_REQUESTS: &str = "app_active_requests";
pub const CPU_USAGE: &str = "app_cpu_usage_percent";
pub const MEMORY_USAGE: &str = "app_memory_usage_bytes";
pub const ERROR_COUNT: &str = "app_error_count_total";
pub const BUILD_INFO: &str = "app_build_info";

/// Typed facade over the shared registry for the loadlab metric set.
pub struct AppMetrics {
    registry: Arc<Registry>,
}

impl AppMetrics {
    /// Register every application metric and set the static build-info
    /// series. Idempotent against re-registration of the same schemas.
    pub fn register(registry: Arc<Registry>, build: &BuildSection) -> Result<Self, MetricsError> {
        registry.register(MetricDesc::counter(
            REQUEST_COUNT,
            "Total request count of the application",
            &["method", "endpoint", "http_status"],
        ))?;
        registry.register(MetricDesc::histogram(
            REQUEST_LATENCY,
            "Request latency in seconds",
            &["method", "endpoint"],
            LATENCY_BUCKETS,
        ))?;
        registry.register(MetricDesc::gauge(
            ACTIVE_REQUESTS,
            "Number of active requests",
            &[],
        ))?;
        registry.register(MetricDesc::gauge(
            CPU_USAGE,
            "Current CPU usage percentage",
            &[],
        ))?;
        registry.register(MetricDesc::gauge(
            MEMORY_USAGE,
            "Current memory usage in bytes",
            &[],
        ))?;
        registry.register(MetricDesc::counter(
            ERROR_COUNT,
            "Total count of errors",
            &["error_type", "endpoint"],
        ))?;
        registry.register(MetricDesc::gauge(
            BUILD_INFO,
            "Application build information",
            &["version", "build_date", "environment"],
        ))?;

        registry.set(
            BUILD_INFO,
            &[
                ("version", &build.version),
                ("build_date", &build.build_date),
                ("environment", &build.environment),
            ],
            1.0,
        )?;

        Ok(Self { registry })
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Count one completed (non-raising) request.
    pub fn record_request(&self, method: &str, endpoint: &str, http_status: u16) {
        let status = http_status.to_string();
        self.try_record(self.registry.inc(
            REQUEST_COUNT,
            &[
                ("method", method),
                ("endpoint", endpoint),
                ("http_status", &status),
            ],
        ));
    }

    /// Count one raised handler error.
    pub fn record_error(&self, error_type: &str, endpoint: &str) {
        self.try_record(self.registry.inc(
            ERROR_COUNT,
            &[("error_type", error_type), ("endpoint", endpoint)],
        ));
    }

    /// Observe wall-clock latency for one request, success or error.
    pub fn observe_latency(&self, method: &str, endpoint: &str, elapsed: Duration) {
        self.try_record(self.registry.observe(
            REQUEST_LATENCY,
            &[("method", method), ("endpoint", endpoint)],
            elapsed.as_secs_f64(),
        ));
    }

    pub fn active_inc(&self) {
        self.try_record(self.registry.gauge_inc(ACTIVE_REQUESTS, &[]));
    }

    pub fn active_dec(&self) {
        self.try_record(self.registry.gauge_dec(ACTIVE_REQUESTS, &[]));
    }

    pub fn set_cpu_percent(&self, percent: f64) {
        self.try_record(self.registry.set(CPU_USAGE, &[], percent));
    }

    pub fn set_memory_bytes(&self, bytes: u64) {
        self.try_record(self.registry.set(MEMORY_USAGE, &[], bytes as f64));
    }

    /// Recording is observational: a registry error here is a bug in this
    /// module's own schemas, so it is logged and dropped, never surfaced to
    /// the request path.
    fn try_record(&self, res: Result<(), MetricsError>) {
        if let Err(e) = res {
            tracing::warn!(error = %e, "metric record failed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::BuildSection;

    fn app_metrics() -> AppMetrics {
        AppMetrics::register(Arc::new(Registry::new()), &BuildSection::default()).unwrap()
    }

    #[test]
    fn register_is_idempotent() {
        let registry = Arc::new(Registry::new());
        let build = BuildSection::default();
        AppMetrics::register(Arc::clone(&registry), &build).unwrap();
        AppMetrics::register(registry, &build).unwrap();
    }

    #[test]
    fn build_info_series_is_set_to_one() {
        let m = app_metrics();
        let build = BuildSection::default();
        let v = m
            .registry()
            .gauge_value(
                BUILD_INFO,
                &[
                    ("version", &build.version),
                    ("build_date", &build.build_date),
                    ("environment", &build.environment),
                ],
            )
            .unwrap();
        assert_eq!(v, 1.0);
    }

    #[test]
    fn request_and_error_counters_are_independent() {
        let m = app_metrics();
        m.record_request("GET", "homepage", 200);
        m.record_request("GET", "homepage", 200);
        m.record_error("Synthetic", "error_endpoint");

        let reqs = m
            .registry()
            .counter_value(
                REQUEST_COUNT,
                &[
                    ("method", "GET"),
                    ("endpoint", "homepage"),
                    ("http_status", "200"),
                ],
            )
            .unwrap();
        assert_eq!(reqs, 2.0);

        let errs = m
            .registry()
            .counter_value(
                ERROR_COUNT,
                &[("error_type", "Synthetic"), ("endpoint", "error_endpoint")],
            )
            .unwrap();
        assert_eq!(errs, 1.0);
    }

    #[test]
    fn active_gauge_round_trips() {
        let m = app_metrics();
        m.active_inc();
        m.active_inc();
        m.active_dec();
        m.active_dec();
        assert_eq!(m.registry().gauge_value(ACTIVE_REQUESTS, &[]).unwrap(), 0.0);
    }
}
