//! Shared application state.
//!
//! The registry and the typed metric set are created once at startup and
//! handed to the router (for the middleware and `/metrics`) and to the
//! sampler, replacing any notion of a global singleton.

use std::sync::Arc;

use loadlab_core::{MetricsError, Registry};

use crate::config::AppConfig;
use crate::metrics::AppMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: AppConfig,
    registry: Arc<Registry>,
    metrics: Arc<AppMetrics>,
}

impl AppState {
    /// Build application state: fresh registry + registered metric set.
    pub fn new(cfg: AppConfig) -> Result<Self, MetricsError> {
        let registry = Arc::new(Registry::new());
        let metrics = Arc::new(AppMetrics::register(Arc::clone(&registry), &cfg.build)?);
        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                metrics,
            }),
        })
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.inner.registry
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.inner.metrics
    }
}
