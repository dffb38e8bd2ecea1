use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use gravity_core::error::Result;
use gravity_core::protocol::{BodyShape, DecodedBody, FieldSpec, FieldType, Reply};

use crate::dispatch::EndpointHandler;
use crate::upstream::{bounded, EmbedInput, InferenceBackend};

pub const DEFAULT_EMBED_MODEL: &str = "text-embedding-004";

pub struct EmbedService {
    backend: Arc<dyn InferenceBackend>,
    timeout: Duration,
}

impl EmbedService {
    pub fn new(backend: Arc<dyn InferenceBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn shape() -> BodyShape {
        BodyShape::empty()
            .field(FieldSpec::required("text", FieldType::Text))
            .field(FieldSpec::optional("model", FieldType::Text, DEFAULT_EMBED_MODEL))
    }
}

#[async_trait]
impl EndpointHandler for EmbedService {
    async fn handle(&self, body: DecodedBody) -> Result<Reply> {
        let text = body.text("text")?;
        let model = body.text("model")?;
        let text_length = text.chars().count();
        tracing::info!(text_length, model, "embedding request");

        let input = EmbedInput {
            text: text.to_string(),
            model: model.to_string(),
        };
        let embedding = bounded(self.timeout, self.backend.embed(input)).await?;

        Ok(Reply::new("Embeddings created successfully")
            .field("embedding_id", embedding.id)
            .field("dimensions", embedding.dimensions)
            .field("model", model)
            .field("text_length", text_length))
    }
}
