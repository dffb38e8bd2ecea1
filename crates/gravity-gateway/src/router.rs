//! Axum router wiring.
//!
//! Ops endpoints are mounted directly; everything else falls through to the
//! route table. Other methods on ops paths fall through as well, so they get
//! the same NOT_FOUND envelope as any unknown route.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/readyz",
            get(ops::readyz).fallback(transport::http::dispatch_entry),
        )
        .route(
            "/metrics",
            get(ops::metrics).fallback(transport::http::dispatch_entry),
        )
        .fallback(transport::http::dispatch_entry)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            transport::gate::policy_gate,
        ))
        .layer(middleware::from_fn(transport::request_id::request_id))
        .with_state(state)
}
