//! HTTP entry for the route table.
//!
//! Converts an axum request into a [`RequestEnvelope`], runs the dispatcher
//! and renders the envelope with its HTTP-equivalent status. Used as the
//! router fallback, so every path not claimed by an ops endpoint lands here.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use gravity_core::protocol::{RawBody, RequestEnvelope, ResponseEnvelope};

use crate::app_state::AppState;

/// Envelope from request metadata. Body left empty.
///
/// Header values that are not valid UTF-8 are kept lossily, so they still take
/// part in the policy checks and can never match an allowlist entry. HTTP/2
/// requests carry the host in the URI authority instead of a Host header.
pub fn envelope_from_parts(parts: &Parts) -> RequestEnvelope {
    let mut env = RequestEnvelope::new(parts.method.as_str(), parts.uri.path());
    for (name, value) in parts.headers.iter() {
        let v = String::from_utf8_lossy(value.as_bytes()).into_owned();
        env = env.with_header(name.as_str(), v);
    }
    if env.host().is_none() {
        if let Some(authority) = parts.uri.authority() {
            env = env.with_header("host", authority.as_str());
        }
    }
    env
}

pub fn render(env: ResponseEnvelope) -> Response {
    let status = StatusCode::from_u16(env.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(env)).into_response()
}

pub async fn dispatch_entry(State(app): State<AppState>, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let limit = app.cfg().server.max_body_bytes;

    let raw = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => RawBody::from_slice(&bytes),
        Err(e) => {
            tracing::debug!(error = %e, limit, "request body read failed");
            RawBody::Malformed(format!("request body unreadable or larger than {limit} bytes"))
        }
    };
    let env = envelope_from_parts(&parts).with_body(raw);

    let started = Instant::now();
    let (route, out) = app.dispatcher().dispatch_with_route(&env).await;
    let route = route.unwrap_or("unmatched");
    let code = out.error.as_deref().unwrap_or("OK");

    let metrics = app.metrics();
    metrics.dispatch_duration.observe(&[("route", route)], started.elapsed());
    metrics.requests.inc(&[("route", route), ("code", code)]);

    render(out)
}
