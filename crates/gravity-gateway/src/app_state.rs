//! Shared application state for the Gravity gateway.
//!
//! Everything here is built once at startup and read-only afterwards, except
//! the metrics registry (atomics).

use std::sync::Arc;

use gravity_core::error::Result;

use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::obs::GatewayMetrics;
use crate::policy::AccessPolicy;
use crate::services;
use crate::upstream::{InferenceBackend, PlaceholderBackend};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<GatewayMetrics>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    policy: AccessPolicy,
}

impl AppState {
    /// Build state with the placeholder backend.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        Self::with_backend(cfg, Arc::new(PlaceholderBackend::new()))
    }

    /// Build state around a specific inference backend.
    pub fn with_backend(cfg: GatewayConfig, backend: Arc<dyn InferenceBackend>) -> Result<Self> {
        let policy = AccessPolicy::new(&cfg.access)?;
        let backend_name = backend.name();
        let dispatcher = services::builtin_dispatcher(&cfg, backend)?;

        tracing::info!(
            routes = ?dispatcher.registered_routes(),
            backend = backend_name,
            "route table built"
        );
        if cfg.access.allowed_origins.is_empty() {
            tracing::info!("no allowed origins configured; cross-origin requests will be rejected");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, policy }),
            dispatcher: Arc::new(dispatcher),
            metrics: Arc::new(GatewayMetrics::default()),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.inner.policy
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }
}
