//! Metric registry: named metrics, schema validation, lazy series creation.
//!
//! A metric is (name, kind, label schema) and is immutable once registered.
//! Each distinct label-value combination lazily materializes one series whose
//! accumulator lives for the rest of the process. Storage is `DashMap` keyed
//! by the label values in schema order, so concurrent request workers and the
//! background sampler update series without a global lock.

pub(crate) mod series;

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{MetricsError, Result};
use series::{AtomicF64, HistogramCell, SeriesCell};

/// Metric kind, fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    /// Name used in `# TYPE` exposition lines and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

/// Immutable metric schema: name, help text, kind, label names, and (for
/// histograms) bucket boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDesc {
    pub name: String,
    pub help: String,
    pub kind: MetricKind,
    pub labels: Vec<String>,
    /// Bucket boundaries; empty unless `kind == Histogram`.
    pub buckets: Vec<f64>,
}

impl MetricDesc {
    pub fn counter(name: &str, help: &str, labels: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            kind: MetricKind::Counter,
            labels: labels.iter().map(|s| s.to_string()).collect(),
            buckets: Vec::new(),
        }
    }

    pub fn gauge(name: &str, help: &str, labels: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            kind: MetricKind::Gauge,
            labels: labels.iter().map(|s| s.to_string()).collect(),
            buckets: Vec::new(),
        }
    }

    pub fn histogram(name: &str, help: &str, labels: &[&str], buckets: &[f64]) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            kind: MetricKind::Histogram,
            labels: labels.iter().map(|s| s.to_string()).collect(),
            buckets: buckets.to_vec(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(MetricsError::InvalidArgument(
                "metric name must not be empty".into(),
            ));
        }
        for (i, l) in self.labels.iter().enumerate() {
            if self.labels[..i].contains(l) {
                return Err(MetricsError::InvalidArgument(format!(
                    "metric {:?} has duplicate label {l:?}",
                    self.name
                )));
            }
        }
        match self.kind {
            MetricKind::Histogram => {
                if self.buckets.is_empty() {
                    return Err(MetricsError::InvalidArgument(format!(
                        "histogram {:?} must declare at least one bucket",
                        self.name
                    )));
                }
                for w in self.buckets.windows(2) {
                    if !(w[0] < w[1]) {
                        return Err(MetricsError::InvalidArgument(format!(
                            "histogram {:?} buckets must be strictly ascending",
                            self.name
                        )));
                    }
                }
                if self.buckets.iter().any(|b| !b.is_finite()) {
                    return Err(MetricsError::InvalidArgument(format!(
                        "histogram {:?} buckets must be finite",
                        self.name
                    )));
                }
            }
            _ => {
                if !self.buckets.is_empty() {
                    return Err(MetricsError::InvalidArgument(format!(
                        "{} {:?} must not declare buckets",
                        self.kind.as_str(),
                        self.name
                    )));
                }
            }
        }
        Ok(())
    }
}

pub(crate) struct Metric {
    pub(crate) desc: MetricDesc,
    pub(crate) series: DashMap<Vec<String>, SeriesCell>,
}

impl Metric {
    /// Map caller-supplied labels (any order) to the series key: the label
    /// values in schema order. The provided names must match the schema
    /// exactly; extras, omissions, and unknown names are all a mismatch.
    fn series_key(&self, labels: &[(&str, &str)]) -> Result<Vec<String>> {
        let mismatch = || MetricsError::LabelMismatch {
            name: self.desc.name.clone(),
            expected: self.desc.labels.clone(),
            got: labels.iter().map(|(k, _)| k.to_string()).collect(),
        };
        if labels.len() != self.desc.labels.len() {
            return Err(mismatch());
        }
        let mut key = Vec::with_capacity(self.desc.labels.len());
        for want in &self.desc.labels {
            let (_, v) = labels
                .iter()
                .find(|(k, _)| *k == want.as_str())
                .ok_or_else(mismatch)?;
            key.push(v.to_string());
        }
        Ok(key)
    }

    fn expect_kind(&self, expected: MetricKind) -> Result<()> {
        if self.desc.kind != expected {
            return Err(MetricsError::KindMismatch {
                name: self.desc.name.clone(),
                expected: expected.as_str(),
                actual: self.desc.kind.as_str(),
            });
        }
        Ok(())
    }
}

/// Thread-safe metric registry. Create once at startup, share via `Arc`.
#[derive(Default)]
pub struct Registry {
    pub(crate) metrics: DashMap<String, Arc<Metric>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metric. Idempotent for an identical schema; a second
    /// registration under the same name with a different schema fails.
    pub fn register(&self, desc: MetricDesc) -> Result<()> {
        desc.validate()?;
        match self.metrics.entry(desc.name.clone()) {
            Entry::Occupied(e) => {
                if e.get().desc == desc {
                    Ok(())
                } else {
                    Err(MetricsError::DuplicateMetric(desc.name))
                }
            }
            Entry::Vacant(v) => {
                tracing::debug!(name = %desc.name, kind = desc.kind.as_str(), "metric registered");
                v.insert(Arc::new(Metric {
                    desc,
                    series: DashMap::new(),
                }));
                Ok(())
            }
        }
    }

    fn metric(&self, name: &str) -> Result<Arc<Metric>> {
        self.metrics
            .get(name)
            .map(|m| Arc::clone(m.value()))
            .ok_or_else(|| MetricsError::UnknownMetric(name.to_string()))
    }

    /// Increment a counter by 1.
    pub fn inc(&self, name: &str, labels: &[(&str, &str)]) -> Result<()> {
        self.add(name, labels, 1.0)
    }

    /// Increment a counter by `amount` (must be finite and >= 0).
    pub fn add(&self, name: &str, labels: &[(&str, &str)], amount: f64) -> Result<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(MetricsError::InvalidArgument(format!(
                "counter increment must be finite and >= 0, got {amount}"
            )));
        }
        let metric = self.metric(name)?;
        metric.expect_kind(MetricKind::Counter)?;
        let key = metric.series_key(labels)?;
        let cell = metric
            .series
            .entry(key)
            .or_insert_with(|| SeriesCell::Counter(AtomicF64::new(0.0)));
        if let SeriesCell::Counter(c) = cell.value() {
            c.add(amount);
        }
        Ok(())
    }

    /// Record one histogram observation (must be finite).
    pub fn observe(&self, name: &str, labels: &[(&str, &str)], value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(MetricsError::InvalidArgument(format!(
                "histogram observation must be finite, got {value}"
            )));
        }
        let metric = self.metric(name)?;
        metric.expect_kind(MetricKind::Histogram)?;
        let key = metric.series_key(labels)?;
        let cell = metric
            .series
            .entry(key)
            .or_insert_with(|| SeriesCell::Histogram(HistogramCell::new(metric.desc.buckets.len())));
        if let SeriesCell::Histogram(h) = cell.value() {
            h.observe(&metric.desc.buckets, value);
        }
        Ok(())
    }

    /// Set a gauge, replacing any previous value.
    pub fn set(&self, name: &str, labels: &[(&str, &str)], value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(MetricsError::InvalidArgument(format!(
                "gauge value must be finite, got {value}"
            )));
        }
        let metric = self.metric(name)?;
        metric.expect_kind(MetricKind::Gauge)?;
        let key = metric.series_key(labels)?;
        let cell = metric
            .series
            .entry(key)
            .or_insert_with(|| SeriesCell::Gauge(AtomicF64::new(0.0)));
        if let SeriesCell::Gauge(g) = cell.value() {
            g.set(value);
        }
        Ok(())
    }

    /// Add a signed delta to a gauge (live-counter usage).
    pub fn gauge_add(&self, name: &str, labels: &[(&str, &str)], delta: f64) -> Result<()> {
        if !delta.is_finite() {
            return Err(MetricsError::InvalidArgument(format!(
                "gauge delta must be finite, got {delta}"
            )));
        }
        let metric = self.metric(name)?;
        metric.expect_kind(MetricKind::Gauge)?;
        let key = metric.series_key(labels)?;
        let cell = metric
            .series
            .entry(key)
            .or_insert_with(|| SeriesCell::Gauge(AtomicF64::new(0.0)));
        if let SeriesCell::Gauge(g) = cell.value() {
            g.add(delta);
        }
        Ok(())
    }

    /// Increment a gauge by 1.
    pub fn gauge_inc(&self, name: &str, labels: &[(&str, &str)]) -> Result<()> {
        self.gauge_add(name, labels, 1.0)
    }

    /// Decrement a gauge by 1.
    pub fn gauge_dec(&self, name: &str, labels: &[(&str, &str)]) -> Result<()> {
        self.gauge_add(name, labels, -1.0)
    }

    /// Current counter value; 0 if the series has not been touched yet.
    pub fn counter_value(&self, name: &str, labels: &[(&str, &str)]) -> Result<f64> {
        let metric = self.metric(name)?;
        metric.expect_kind(MetricKind::Counter)?;
        let key = metric.series_key(labels)?;
        Ok(metric
            .series
            .get(&key)
            .and_then(|cell| match cell.value() {
                SeriesCell::Counter(c) => Some(c.get()),
                _ => None,
            })
            .unwrap_or(0.0))
    }

    /// Current gauge value; 0 if the series has not been touched yet.
    pub fn gauge_value(&self, name: &str, labels: &[(&str, &str)]) -> Result<f64> {
        let metric = self.metric(name)?;
        metric.expect_kind(MetricKind::Gauge)?;
        let key = metric.series_key(labels)?;
        Ok(metric
            .series
            .get(&key)
            .and_then(|cell| match cell.value() {
                SeriesCell::Gauge(g) => Some(g.get()),
                _ => None,
            })
            .unwrap_or(0.0))
    }

    /// Total observation count for a histogram series; 0 if untouched.
    pub fn histogram_count(&self, name: &str, labels: &[(&str, &str)]) -> Result<u64> {
        let metric = self.metric(name)?;
        metric.expect_kind(MetricKind::Histogram)?;
        let key = metric.series_key(labels)?;
        Ok(metric
            .series
            .get(&key)
            .and_then(|cell| match cell.value() {
                SeriesCell::Histogram(h) => Some(h.count_value()),
                _ => None,
            })
            .unwrap_or(0))
    }
}
