//! Prometheus text exposition.
//!
//! `Registry::snapshot` takes one atomic read pass over every series and
//! returns an owned `Snapshot`; no lock is held while the text is produced.
//! Rendering is a restartable line iterator (`Snapshot::lines`) so callers
//! can stream or re-walk the output, plus `to_text` for the common case.
//! Individual series values are torn-free; cross-series consistency within
//! one snapshot is not guaranteed.

use std::fmt::Write;

use crate::registry::series::SeriesCell;
use crate::registry::{MetricKind, Registry};

/// Content type for the `/metrics` response body.
pub const TEXT_EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Point-in-time copy of every registered metric and its series.
pub struct Snapshot {
    metrics: Vec<MetricSnapshot>,
}

/// One metric group: schema plus its materialized series.
pub struct MetricSnapshot {
    pub name: String,
    pub help: String,
    pub kind: MetricKind,
    pub labels: Vec<String>,
    pub buckets: Vec<f64>,
    pub series: Vec<SeriesSnapshot>,
}

/// One series: label values in schema order plus the accumulator value.
pub struct SeriesSnapshot {
    pub label_values: Vec<String>,
    pub value: SeriesValue,
}

pub enum SeriesValue {
    Counter(f64),
    Gauge(f64),
    Histogram {
        bucket_counts: Vec<u64>,
        sum: f64,
        count: u64,
    },
}

impl Registry {
    /// Collect a snapshot of every registered metric. Metrics with no series
    /// yet still appear so their HELP/TYPE group is always exported.
    /// Deterministically ordered (metrics by name, series by label values).
    pub fn snapshot(&self) -> Snapshot {
        let mut metrics: Vec<MetricSnapshot> = self
            .metrics
            .iter()
            .map(|entry| {
                let metric = entry.value();
                let mut series: Vec<SeriesSnapshot> = metric
                    .series
                    .iter()
                    .map(|s| SeriesSnapshot {
                        label_values: s.key().clone(),
                        value: match s.value() {
                            SeriesCell::Counter(c) => SeriesValue::Counter(c.get()),
                            SeriesCell::Gauge(g) => SeriesValue::Gauge(g.get()),
                            SeriesCell::Histogram(h) => SeriesValue::Histogram {
                                bucket_counts: h.bucket_values(),
                                sum: h.sum.get(),
                                count: h.count_value(),
                            },
                        },
                    })
                    .collect();
                series.sort_by(|a, b| a.label_values.cmp(&b.label_values));
                MetricSnapshot {
                    name: metric.desc.name.clone(),
                    help: metric.desc.help.clone(),
                    kind: metric.desc.kind,
                    labels: metric.desc.labels.clone(),
                    buckets: metric.desc.buckets.clone(),
                    series,
                }
            })
            .collect();
        metrics.sort_by(|a, b| a.name.cmp(&b.name));
        Snapshot { metrics }
    }
}

impl Snapshot {
    /// Lazy, restartable line sequence over the whole snapshot.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.metrics.iter().flat_map(metric_lines)
    }

    /// Full exposition body, one line per entry, trailing newline included.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in self.lines() {
            let _ = writeln!(out, "{line}");
        }
        out
    }

    pub fn metrics(&self) -> &[MetricSnapshot] {
        &self.metrics
    }
}

fn metric_lines(m: &MetricSnapshot) -> Vec<String> {
    let mut lines = Vec::with_capacity(2 + m.series.len());
    lines.push(format!("# HELP {} {}", m.name, escape_help(&m.help)));
    lines.push(format!("# TYPE {} {}", m.name, m.kind.as_str()));
    for s in &m.series {
        match &s.value {
            SeriesValue::Counter(v) | SeriesValue::Gauge(v) => {
                lines.push(format!(
                    "{}{} {}",
                    m.name,
                    braced(&label_pairs(&m.labels, &s.label_values)),
                    fmt_value(*v)
                ));
            }
            SeriesValue::Histogram {
                bucket_counts,
                sum,
                count,
            } => {
                let pairs = label_pairs(&m.labels, &s.label_values);
                let prefix = if pairs.is_empty() {
                    String::new()
                } else {
                    format!("{pairs},")
                };
                for (i, le) in m.buckets.iter().enumerate() {
                    lines.push(format!(
                        "{}_bucket{{{}le=\"{}\"}} {}",
                        m.name,
                        prefix,
                        fmt_value(*le),
                        bucket_counts[i]
                    ));
                }
                lines.push(format!("{}_bucket{{{}le=\"+Inf\"}} {}", m.name, prefix, count));
                lines.push(format!("{}_sum{} {}", m.name, braced(&pairs), fmt_value(*sum)));
                lines.push(format!("{}_count{} {}", m.name, braced(&pairs), count));
            }
        }
    }
    lines
}

fn braced(pairs: &str) -> String {
    if pairs.is_empty() {
        String::new()
    } else {
        format!("{{{pairs}}}")
    }
}

fn label_pairs(names: &[String], values: &[String]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Escape a label value per the exposition format.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// HELP text escapes backslash and newline only.
fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Integral values render without a fractional part.
fn fmt_value(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
