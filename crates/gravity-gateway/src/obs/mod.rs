//! Observability: log subscriber setup and in-process metrics.
//!
//! Metrics are stored as atomics and rendered by the `/metrics` handler.

pub mod logging;
pub mod metrics;

pub use metrics::GatewayMetrics;
