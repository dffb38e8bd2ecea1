//! Built-in endpoint services and their route table.

pub mod ask;
pub mod embed;
pub mod health;
pub mod insights;
pub mod webhook;

use std::sync::Arc;
use std::time::Duration;

use gravity_core::error::Result;

use crate::config::GatewayConfig;
use crate::dispatch::{Dispatcher, Route};
use crate::upstream::InferenceBackend;

pub use ask::AskService;
pub use embed::EmbedService;
pub use health::HealthService;
pub use insights::InsightsService;
pub use webhook::WebhookService;

/// API version reported by `/healthz`.
pub const API_VERSION: &str = "1.0.0";

/// Build the dispatcher with every built-in route.
pub fn builtin_dispatcher(
    cfg: &GatewayConfig,
    backend: Arc<dyn InferenceBackend>,
) -> Result<Dispatcher> {
    let timeout = Duration::from_millis(cfg.upstream.timeout_ms);
    let mut d = Dispatcher::new();

    d.register(Route::get(
        "/healthz",
        "health",
        Arc::new(HealthService::new(API_VERSION, cfg.environment.clone())),
    ))?;
    d.register(Route::post(
        "/wa/webhook",
        "webhook",
        WebhookService::shape(),
        Arc::new(WebhookService::new()),
    ))?;
    d.register(Route::post(
        "/rag/embed",
        "embed",
        EmbedService::shape(),
        Arc::new(EmbedService::new(Arc::clone(&backend), timeout)),
    ))?;
    d.register(Route::post(
        "/rag/ask",
        "ask",
        AskService::shape(),
        Arc::new(AskService::new(Arc::clone(&backend), timeout)),
    ))?;
    d.register(Route::post(
        "/insights/run",
        "insights",
        InsightsService::shape(),
        Arc::new(InsightsService::new(backend, timeout)),
    ))?;

    Ok(d)
}
