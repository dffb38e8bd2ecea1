use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use gravity_core::error::Result;
use gravity_core::protocol::{DecodedBody, Reply};

use crate::dispatch::EndpointHandler;

/// Liveness for load balancers and monitoring.
pub struct HealthService {
    version: &'static str,
    environment: String,
}

impl HealthService {
    pub fn new(version: &'static str, environment: impl Into<String>) -> Self {
        Self {
            version,
            environment: environment.into(),
        }
    }
}

#[async_trait]
impl EndpointHandler for HealthService {
    async fn handle(&self, _body: DecodedBody) -> Result<Reply> {
        Ok(Reply::new("Service healthy")
            .field("status", "healthy")
            .field("timestamp", Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
            .field("version", self.version)
            .field("environment", self.environment.as_str()))
    }
}
