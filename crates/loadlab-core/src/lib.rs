//! loadlab core: the in-process metrics registry and its text exposition.
//!
//! This crate defines the metric data model (counters, histograms, gauges
//! keyed by label sets), the thread-safe registry that stores them, and the
//! Prometheus text-format snapshot. It intentionally carries no transport or
//! runtime dependencies so the server, the sampler, and tests all share one
//! registry implementation.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `MetricsError`/`Result`, so a bad label set
//! or a mis-registered metric never crashes the process that is being
//! observed.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod expose;
pub mod registry;

/// Shared result type.
pub use error::{MetricsError, Result};
pub use expose::Snapshot;
pub use registry::{MetricDesc, MetricKind, Registry};
