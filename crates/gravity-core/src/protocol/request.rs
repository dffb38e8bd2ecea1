//! Inbound request envelope.
//!
//! Transport layers build one of these per request and never mutate it
//! afterwards. Header names are folded to lowercase on insert so lookups are
//! case-insensitive.

use std::collections::BTreeMap;

use serde_json::Value;

/// Request body as received by the transport.
///
/// A body that failed to parse is kept as `Malformed` so routing still runs
/// first; only a matched route turns it into `BAD_REQUEST`.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    Empty,
    Json(Value),
    Malformed(String),
}

impl RawBody {
    /// Parse raw bytes. Whitespace-only input counts as empty.
    pub fn from_slice(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return RawBody::Empty;
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(v) => RawBody::Json(v),
            Err(e) => RawBody::Malformed(format!("invalid JSON body: {e}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    method: String,
    path: String,
    headers: BTreeMap<String, String>,
    body: RawBody,
}

impl RequestEnvelope {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            path: path.into(),
            headers: BTreeMap::new(),
            body: RawBody::Empty,
        }
    }

    /// Builder-style header insert. Later values for the same name win.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: RawBody) -> Self {
        self.body = body;
        self
    }

    /// Convenience for tests and internal callers holding a JSON value.
    pub fn with_json(self, v: Value) -> Self {
        self.with_body(RawBody::Json(v))
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn host(&self) -> Option<&str> {
        self.header("host")
    }

    pub fn origin(&self) -> Option<&str> {
        self.header("origin")
    }

    pub fn body(&self) -> &RawBody {
        &self.body
    }
}
