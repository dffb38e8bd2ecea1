use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use gravity_core::error::Result;
use gravity_core::protocol::{BodyShape, DecodedBody, FieldSpec, FieldType, Reply};

use crate::dispatch::EndpointHandler;

/// WhatsApp webhook receiver. Accepts any JSON object under `data`.
///
/// Signature verification and message processing live outside this service.
#[derive(Default)]
pub struct WebhookService;

impl WebhookService {
    pub fn new() -> Self {
        Self
    }

    pub fn shape() -> BodyShape {
        BodyShape::empty().field(FieldSpec::required("data", FieldType::Mapping))
    }
}

#[async_trait]
impl EndpointHandler for WebhookService {
    async fn handle(&self, body: DecodedBody) -> Result<Reply> {
        let data = body.mapping("data")?;
        let size = serde_json::to_string(data).map(|s| s.len()).unwrap_or_default();
        tracing::info!(bytes = size, "WhatsApp webhook received");

        Ok(Reply::new("WhatsApp webhook processed")
            .field("webhook_id", "stub_webhook_123")
            .field("processed_at", Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
            .field("status", "received"))
    }
}
