//! Top-level facade crate for Gravity.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use gravity_core::*;
}

pub mod gateway {
    pub use gravity_gateway::*;
}
