//! Top-level facade crate for loadlab.
//!
//! Re-exports the metrics core and the server library so users can depend on
//! a single crate.

pub mod core {
    pub use loadlab_core::*;
}

pub mod server {
    pub use loadlab_server::*;
}
