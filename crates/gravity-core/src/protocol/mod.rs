//! Transport-agnostic protocol types.
//!
//! - `request`: immutable inbound request envelope
//! - `response`: uniform `{success, message, data}` envelope
//! - `shape`: per-route body schemas and the generic decoder

pub mod request;
pub mod response;
pub mod shape;

pub use request::{RawBody, RequestEnvelope};
pub use response::{Reply, ResponseEnvelope};
pub use shape::{BodyShape, DecodedBody, FieldSpec, FieldType};
