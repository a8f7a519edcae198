//! Atomic accumulators backing individual series.
//!
//! Values are stored as `f64` bit patterns inside `AtomicU64` so a reader
//! never observes a torn value. Additions use a CAS loop; gauge sets and all
//! reads are single atomic operations.

use std::sync::atomic::{AtomicU64, Ordering};

/// An `f64` cell with atomic load/store/add.
pub(crate) struct AtomicF64(AtomicU64);

impl AtomicF64 {
    pub(crate) fn new(v: f64) -> Self {
        Self(AtomicU64::new(v.to_bits()))
    }

    pub(crate) fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub(crate) fn set(&self, v: f64) {
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }

    pub(crate) fn add(&self, delta: f64) {
        let mut cur = self.0.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(cur) + delta).to_bits();
            match self
                .0
                .compare_exchange_weak(cur, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(observed) => cur = observed,
            }
        }
    }
}

/// Histogram accumulator: one cumulative count per bucket boundary, plus
/// running sum and total count. The `+Inf` bucket is the total count.
pub(crate) struct HistogramCell {
    pub(crate) bucket_counts: Vec<AtomicU64>,
    pub(crate) sum: AtomicF64,
    pub(crate) count: AtomicU64,
}

impl HistogramCell {
    pub(crate) fn new(num_buckets: usize) -> Self {
        Self {
            bucket_counts: (0..num_buckets).map(|_| AtomicU64::new(0)).collect(),
            sum: AtomicF64::new(0.0),
            count: AtomicU64::new(0),
        }
    }

    /// Record one observation against fixed, ascending boundaries.
    pub(crate) fn observe(&self, boundaries: &[f64], value: f64) {
        for (i, &le) in boundaries.iter().enumerate() {
            if value <= le {
                self.bucket_counts[i].fetch_add(1, Ordering::Relaxed);
            }
        }
        self.sum.add(value);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn bucket_values(&self) -> Vec<u64> {
        self.bucket_counts
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .collect()
    }

    pub(crate) fn count_value(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

/// One concrete series accumulator; the variant is fixed by the metric kind.
pub(crate) enum SeriesCell {
    Counter(AtomicF64),
    Gauge(AtomicF64),
    Histogram(HistogramCell),
}
