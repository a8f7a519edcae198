//! Background system sampler.
//!
//! One long-lived task, independent of request traffic: every interval it
//! samples host CPU utilization over a blocking window plus the current
//! process RSS, and writes both gauges. The task is cancellable through a
//! watch channel checked each iteration, so tests (and shutdown) can stop it
//! deterministically instead of leaning on detached-task semantics.
//!
//! A failed sample is logged and the tick skipped; sampling trouble must
//! never take the server down.

use std::sync::Arc;
use std::time::Duration;

use sysinfo::{ProcessesToUpdate, System};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::SamplerSection;
use crate::metrics::AppMetrics;

#[derive(Debug, Error)]
enum SampleError {
    #[error("current pid unavailable: {0}")]
    Pid(String),
    #[error("current process not found")]
    ProcessGone,
    #[error("sampling task failed: {0}")]
    Join(String),
}

struct SystemSample {
    cpu_percent: f64,
    memory_bytes: u64,
}

/// Handle to the running sampler; dropping it does not stop the task,
/// `shutdown` does.
pub struct SamplerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SamplerHandle {
    /// Signal the loop to stop and wait for it to exit.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}

/// Spawn the sampler loop. The first tick fires immediately.
pub fn spawn(metrics: Arc<AppMetrics>, cfg: &SamplerSection) -> SamplerHandle {
    let interval = Duration::from_millis(cfg.interval_ms);
    let cpu_window = Duration::from_millis(cfg.cpu_window_ms);
    let (stop, mut stopped) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match sample(cpu_window).await {
                        Ok(s) => {
                            metrics.set_cpu_percent(s.cpu_percent);
                            metrics.set_memory_bytes(s.memory_bytes);
                            tracing::debug!(
                                cpu_percent = s.cpu_percent,
                                memory_bytes = s.memory_bytes,
                                "system sample"
                            );
                        }
                        Err(e) => tracing::warn!(error = %e, "system sample failed; skipping tick"),
                    }
                }
                _ = stopped.changed() => break,
            }
        }
        tracing::debug!("sampler stopped");
    });

    SamplerHandle { stop, task }
}

/// Take one sample. The CPU window blocks, so the work runs on the blocking
/// pool; the async loop stays responsive to the stop signal between ticks.
async fn sample(cpu_window: Duration) -> Result<SystemSample, SampleError> {
    tokio::task::spawn_blocking(move || sample_blocking(cpu_window))
        .await
        .map_err(|e| SampleError::Join(e.to_string()))?
}

fn sample_blocking(cpu_window: Duration) -> Result<SystemSample, SampleError> {
    let mut sys = System::new();

    // CPU utilization is a delta between two refreshes over the window.
    sys.refresh_cpu_usage();
    std::thread::sleep(cpu_window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
    sys.refresh_cpu_usage();
    let cpu_percent = f64::from(sys.global_cpu_usage());

    let pid = sysinfo::get_current_pid().map_err(|e| SampleError::Pid(e.to_string()))?;
    sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    let memory_bytes = sys
        .process(pid)
        .map(|p| p.memory())
        .ok_or(SampleError::ProcessGone)?;

    Ok(SystemSample {
        cpu_percent,
        memory_bytes,
    })
}
