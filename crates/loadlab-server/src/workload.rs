//! Synthetic CPU workload.
//!
//! Deliberately burns a wall-clock budget with arithmetic to simulate a
//! CPU-bound request. Kept in its own module, away from request-handling
//! logic. The loop runs on the blocking pool so it occupies one worker
//! thread for its duration without stalling the async runtime.

use std::time::{Duration, Instant};

/// Busy-loop for `budget` wall-clock time on a blocking-pool thread.
pub async fn burn_cpu(budget: Duration) {
    let _ = tokio::task::spawn_blocking(move || burn_blocking(budget)).await;
}

fn burn_blocking(budget: Duration) -> u64 {
    let start = Instant::now();
    let mut acc: u64 = 0;
    while start.elapsed() < budget {
        for i in 0..1000u64 {
            acc = acc.wrapping_add(std::hint::black_box(i * i));
        }
    }
    acc
}
