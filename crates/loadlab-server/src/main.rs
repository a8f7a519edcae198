//! loadlab server binary.
//!
//! Synthetic latency/error/CPU endpoints plus self-reported Prometheus-style
//! metrics at `/metrics`. Config comes from `loadlab.yaml` when present,
//! defaults otherwise.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use loadlab_server::{app_state, config, router, sampler};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_or_default("loadlab.yaml").expect("config load failed");
    let listen: SocketAddr = cfg
        .server
        .listen
        .parse()
        .expect("server.listen must be a valid SocketAddr");
    let sampler_cfg = cfg.sampler.clone();

    let state = app_state::AppState::new(cfg).expect("metric registration failed");
    let sampler = sampler::spawn(Arc::clone(state.metrics()), &sampler_cfg);
    let app = router::build_router(state);

    tracing::info!(%listen, "loadlab-server starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");

    sampler.shutdown().await;
    tracing::info!("loadlab-server stopped");
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
