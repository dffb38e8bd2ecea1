//! Policy gate middleware.
//!
//! Runs before routing on every path, ops endpoints included. A rejection
//! short-circuits with a client-error envelope; an allowed cross-origin
//! request gets its origin echoed back.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

use gravity_core::protocol::ResponseEnvelope;

use crate::app_state::AppState;

use super::http::{envelope_from_parts, render};

pub async fn policy_gate(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let meta = envelope_from_parts(&parts);

    if let Err(err) = app.policy().check(&meta) {
        let code = err.client_code();
        app.metrics().policy_rejections.inc(&[("code", code.as_str())]);
        tracing::info!(code = code.as_str(), error = %err, "request rejected by policy");
        return render(ResponseEnvelope::from(&err));
    }

    let mut res = next.run(Request::from_parts(parts, body)).await;
    if let Some(origin) = meta.origin() {
        allow_origin(&mut res, origin);
    }
    res
}

/// CORS response headers for an origin that passed the gate. Credentials are never allowed.
fn allow_origin(res: &mut Response, origin: &str) {
    if let Ok(v) = HeaderValue::from_str(origin) {
        let headers = res.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, v);
        headers.append(header::VARY, HeaderValue::from_static("origin"));
    }
}
