//! Request ID propagation and the per-request log span.
//!
//! An inbound `x-request-id` is reused when it is printable and short;
//! otherwise a UUID v4 is generated. The id is echoed on every response.

use std::time::Instant;

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

const MAX_INBOUND_ID_LEN: usize = 128;

fn inbound_id(req: &Request) -> Option<String> {
    let v = req.headers().get(X_REQUEST_ID)?.to_str().ok()?.trim();
    if v.is_empty() || v.len() > MAX_INBOUND_ID_LEN {
        return None;
    }
    Some(v.to_string())
}

pub async fn request_id(req: Request, next: Next) -> Response {
    let id = inbound_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "http_request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let started = Instant::now();
    let mut res = next.run(req).instrument(span.clone()).await;

    if let Ok(v) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(X_REQUEST_ID, v);
    }
    span.in_scope(|| {
        tracing::info!(
            status = res.status().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
    });
    res
}
