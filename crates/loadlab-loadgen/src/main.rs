//! Randomized traffic generator for the loadlab server.
//!
//! Simulates N concurrent users, each looping until the run deadline: pick a
//! random endpoint, GET it, log the outcome, think for a random 0.1–2.0 s.
//! Request failures are logged and the loop keeps going; the generator is an
//! external caller and records nothing itself.
//!
//! Configuration via environment:
//! - `LOADLAB_BASE_URL`     (default `http://localhost:5000`)
//! - `LOADLAB_USERS`        (default 5)
//! - `LOADLAB_DURATION_SECS` (default 300)

use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

const ENDPOINTS: &[&str] = &["/", "/slow", "/error", "/cpu-intensive"];

struct LoadConfig {
    base_url: String,
    users: usize,
    duration: Duration,
}

impl LoadConfig {
    fn from_env() -> Self {
        let base_url = std::env::var("LOADLAB_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());
        let users = std::env::var("LOADLAB_USERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        let duration_secs = std::env::var("LOADLAB_DURATION_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);
        Self {
            base_url,
            users,
            duration: Duration::from_secs(duration_secs),
        }
    }
}

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = LoadConfig::from_env();
    tracing::info!(
        base_url = %cfg.base_url,
        users = cfg.users,
        duration_secs = cfg.duration.as_secs(),
        "starting load run"
    );

    let client = reqwest::Client::new();
    let deadline = Instant::now() + cfg.duration;

    let mut tasks = Vec::with_capacity(cfg.users);
    for user in 0..cfg.users {
        let client = client.clone();
        let base_url = cfg.base_url.clone();
        tasks.push(tokio::spawn(simulate_user(client, base_url, user, deadline)));
    }
    for t in tasks {
        let _ = t.await;
    }

    tracing::info!("load run complete");
}

async fn simulate_user(client: reqwest::Client, base_url: String, user: usize, deadline: Instant) {
    while Instant::now() < deadline {
        // rng is scoped so it is never held across an await
        let (endpoint, think_secs) = {
            let mut rng = rand::thread_rng();
            (
                ENDPOINTS[rng.gen_range(0..ENDPOINTS.len())],
                rng.gen_range(0.1..=2.0),
            )
        };

        let start = Instant::now();
        match client.get(format!("{base_url}{endpoint}")).send().await {
            Ok(res) => tracing::info!(
                user,
                endpoint,
                status = %res.status(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "request complete"
            ),
            Err(e) => tracing::warn!(user, endpoint, error = %e, "request failed"),
        }

        tokio::time::sleep(Duration::from_secs_f64(think_secs)).await;
    }
    tracing::debug!(user, "user done");
}
