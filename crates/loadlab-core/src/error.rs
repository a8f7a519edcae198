//! Shared error type for the metrics registry.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Unified error surface for registry operations.
///
/// Every variant names the metric involved so callers can log a useful
/// message without re-deriving context.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// A metric name was registered twice with a different schema.
    /// Re-registering an identical schema is a no-op, not an error.
    #[error("duplicate metric {0:?} registered with a different schema")]
    DuplicateMetric(String),

    /// An update targeted a name that was never registered.
    #[error("unknown metric {0:?}")]
    UnknownMetric(String),

    /// An update used the wrong operation for the metric kind
    /// (e.g. `observe` on a counter).
    #[error("metric {name:?} is a {actual}, not a {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The supplied label names do not match the registered schema.
    #[error("metric {name:?} label mismatch: expected {expected:?}, got {got:?}")]
    LabelMismatch {
        name: String,
        expected: Vec<String>,
        got: Vec<String>,
    },

    /// A value outside the operation's domain (negative counter increment,
    /// non-finite observation, malformed bucket boundaries).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
