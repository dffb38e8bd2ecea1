use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;

use gravity_core::error::{GravityError, Result};
use gravity_core::protocol::{BodyShape, DecodedBody, Reply, RequestEnvelope, ResponseEnvelope};

/// Endpoint handler. Receives the body already validated against its route's shape.
#[async_trait]
pub trait EndpointHandler: Send + Sync {
    async fn handle(&self, body: DecodedBody) -> Result<Reply>;
}

/// Route definition. Immutable once registered.
#[derive(Clone)]
pub struct Route {
    pub method: &'static str,
    pub path: &'static str,
    /// Label for logs and metrics.
    pub name: &'static str,
    pub shape: BodyShape,
    handler: Arc<dyn EndpointHandler>,
}

impl Route {
    pub fn new(
        method: &'static str,
        path: &'static str,
        name: &'static str,
        shape: BodyShape,
        handler: Arc<dyn EndpointHandler>,
    ) -> Self {
        Self { method, path, name, shape, handler }
    }

    pub fn get(path: &'static str, name: &'static str, handler: Arc<dyn EndpointHandler>) -> Self {
        Self::new("GET", path, name, BodyShape::empty(), handler)
    }

    pub fn post(
        path: &'static str,
        name: &'static str,
        shape: BodyShape,
        handler: Arc<dyn EndpointHandler>,
    ) -> Self {
        Self::new("POST", path, name, shape, handler)
    }
}

/// Route registry keyed by exact path, then method.
/// Built at startup; read-only afterwards, shared without locks.
#[derive(Default)]
pub struct Dispatcher {
    routes: HashMap<&'static str, HashMap<&'static str, Route>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a route. Duplicate (method, path) is a startup error.
    pub fn register(&mut self, route: Route) -> Result<()> {
        let by_method = self.routes.entry(route.path).or_default();
        if by_method.contains_key(route.method) {
            return Err(GravityError::Internal(format!(
                "duplicate route: {} {}",
                route.method, route.path
            )));
        }
        by_method.insert(route.method, route);
        Ok(())
    }

    pub fn registered_routes(&self) -> Vec<(&'static str, &'static str)> {
        let mut out: Vec<_> = self
            .routes
            .values()
            .flat_map(|m| m.values().map(|r| (r.method, r.path)))
            .collect();
        out.sort();
        out
    }

    pub fn lookup(&self, method: &str, path: &str) -> Option<&Route> {
        self.routes.get(path).and_then(|m| m.get(method))
    }

    /// Full pipeline: lookup, decode, invoke, wrap. Never fails; every error
    /// becomes an envelope here.
    pub async fn dispatch(&self, req: &RequestEnvelope) -> ResponseEnvelope {
        self.dispatch_with_route(req).await.1
    }

    /// Like [`dispatch`](Self::dispatch), also returning the matched route name.
    pub async fn dispatch_with_route(
        &self,
        req: &RequestEnvelope,
    ) -> (Option<&'static str>, ResponseEnvelope) {
        let Some(route) = self.lookup(req.method(), req.path()) else {
            let err = GravityError::NotFound {
                method: req.method().to_string(),
                path: req.path().to_string(),
            };
            tracing::debug!(error = %err, "no route matched");
            return (None, ResponseEnvelope::from(&err));
        };

        let env = match run_route(route, req).await {
            Ok(reply) => reply.into_envelope(),
            Err(e) => {
                log_failure(route.name, &e);
                ResponseEnvelope::from(&e)
            }
        };
        (Some(route.name), env)
    }
}

async fn run_route(route: &Route, req: &RequestEnvelope) -> Result<Reply> {
    let body = route.shape.decode(req.body())?;

    // A panicking handler must not take the connection task down with it.
    match AssertUnwindSafe(route.handler.handle(body)).catch_unwind().await {
        Ok(res) => res,
        Err(panic) => {
            let detail = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            Err(GravityError::Internal(format!("handler panicked: {detail}")))
        }
    }
}

fn log_failure(route: &str, e: &GravityError) {
    let code = e.client_code();
    if code.is_client_error() {
        tracing::info!(route, code = code.as_str(), error = %e, "request rejected");
    } else if matches!(e, GravityError::Upstream(_)) {
        tracing::warn!(route, code = code.as_str(), error = %e, "upstream call failed");
    } else {
        tracing::error!(route, code = code.as_str(), error = %e, "internal server error");
    }
}
