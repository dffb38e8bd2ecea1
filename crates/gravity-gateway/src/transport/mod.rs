//! HTTP transport.
//!
//! Middleware order, outermost first: request id + span, policy gate, then
//! either an ops endpoint or the route-table entry.

pub mod gate;
pub mod http;
pub mod request_id;

pub use request_id::X_REQUEST_ID;
