//! Shared error type across Gravity crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientCode {
    /// Host header not in the allowed host patterns.
    ForbiddenHost,
    /// Cross-origin request from an origin that is not allowed.
    ForbiddenOrigin,
    /// HTTP method outside the allowed set.
    MethodNotAllowed,
    /// No route for (method, path).
    NotFound,
    /// Invalid input / malformed body.
    BadRequest,
    /// External backend failed or timed out.
    UpstreamError,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::ForbiddenHost => "FORBIDDEN_HOST",
            ClientCode::ForbiddenOrigin => "FORBIDDEN_ORIGIN",
            ClientCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UpstreamError => "UPSTREAM_ERROR",
            ClientCode::Internal => "INTERNAL_ERROR",
        }
    }

    /// HTTP-equivalent status code.
    pub fn http_status(self) -> u16 {
        match self {
            ClientCode::ForbiddenHost => 400,
            ClientCode::ForbiddenOrigin => 403,
            ClientCode::MethodNotAllowed => 405,
            ClientCode::NotFound => 404,
            ClientCode::BadRequest => 400,
            ClientCode::UpstreamError => 502,
            ClientCode::Internal => 500,
        }
    }

    /// Policy rejections and validation failures are the caller's fault.
    pub fn is_client_error(self) -> bool {
        (400..500).contains(&self.http_status())
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GravityError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum GravityError {
    #[error("invalid host header: {0}")]
    ForbiddenHost(String),
    #[error("origin not allowed: {0}")]
    ForbiddenOrigin(String),
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error("endpoint not found: {method} {path}")]
    NotFound { method: String, path: String },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl GravityError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            GravityError::ForbiddenHost(_) => ClientCode::ForbiddenHost,
            GravityError::ForbiddenOrigin(_) => ClientCode::ForbiddenOrigin,
            GravityError::MethodNotAllowed(_) => ClientCode::MethodNotAllowed,
            GravityError::NotFound { .. } => ClientCode::NotFound,
            GravityError::BadRequest(_) => ClientCode::BadRequest,
            GravityError::Upstream(_) => ClientCode::UpstreamError,
            GravityError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Message safe to show to callers.
    ///
    /// Server-side failures get fixed text; their detail only goes to logs.
    pub fn public_message(&self) -> String {
        match self {
            GravityError::ForbiddenHost(_) => "Invalid host header".to_string(),
            GravityError::ForbiddenOrigin(_) => "Origin not allowed".to_string(),
            GravityError::MethodNotAllowed(m) => format!("Method {m} not allowed"),
            GravityError::NotFound { .. } => "Endpoint not found".to_string(),
            GravityError::BadRequest(msg) => msg.clone(),
            GravityError::Upstream(_) => "Upstream service unavailable".to_string(),
            GravityError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
