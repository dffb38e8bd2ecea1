//! Endpoint router.
//!
//! Re-exports the dispatcher, route definition and handler trait so
//! downstream consumers can depend on this module directly.

pub mod dispatcher;

pub use dispatcher::{Dispatcher, EndpointHandler, Route};
