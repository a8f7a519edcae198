//! loadlab server library.
//!
//! This crate wires the metrics registry, the instrumentation middleware, the
//! synthetic endpoint handlers, and the background system sampler into one
//! HTTP service. It is intended to be consumed by the binary (`main.rs`) and
//! by integration tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod sampler;
pub mod workload;
