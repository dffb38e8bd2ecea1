//! Gravity gateway library entry.
//!
//! Wires the policy gate, route table, endpoint services and HTTP transport
//! into one axum application. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
pub mod services;
pub mod transport;
pub mod upstream;
