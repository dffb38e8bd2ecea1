//! Gravity core: transport-agnostic protocol primitives and error types.
//!
//! This crate defines the request/response contracts, body-shape decoding,
//! and the error surface shared by the gateway and its tests. It carries no
//! transport or runtime dependencies.
//!
//! Panics, `unwrap`, and `expect` are denied here. Every fallible path
//! surfaces as a [`GravityError`].

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ClientCode, GravityError, Result};
