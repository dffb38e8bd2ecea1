//! Uniform response envelope.
//!
//! Every endpoint answers with `{success, message, data}`. Failures also carry
//! `error` (stable code string) and `status_code`, so the `{error,
//! status_code}` error body is part of the same shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientCode, GravityError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ResponseEnvelope {
    pub fn ok(message: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            error: None,
            status_code: None,
        }
    }

    pub fn failure(code: ClientCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Map::new(),
            error: Some(code.as_str().to_string()),
            status_code: Some(code.http_status()),
        }
    }

    /// HTTP-equivalent status (200 for success).
    pub fn http_status(&self) -> u16 {
        self.status_code.unwrap_or(200)
    }
}

impl From<&GravityError> for ResponseEnvelope {
    fn from(e: &GravityError) -> Self {
        ResponseEnvelope::failure(e.client_code(), e.public_message())
    }
}

/// Handler output before it is wrapped: message + data fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub message: String,
    pub data: Map<String, Value>,
}

impl Reply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: Map::new(),
        }
    }

    /// Attach a data field.
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn into_envelope(self) -> ResponseEnvelope {
        ResponseEnvelope::ok(self.message, self.data)
    }
}
