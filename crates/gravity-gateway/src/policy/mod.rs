//! Policy gate (host, origin, and method allowlists).
//!
//! Compiles the access configuration into lookup structures once at startup.
//! The transport layer evaluates every inbound request before routing.

pub mod allowlist;
pub mod engine;

pub use engine::{AccessPolicy, PolicyDecision, ALLOWED_METHODS};
