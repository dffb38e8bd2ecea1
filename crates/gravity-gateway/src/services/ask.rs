use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use gravity_core::error::{GravityError, Result};
use gravity_core::protocol::{BodyShape, DecodedBody, FieldSpec, FieldType, Reply};

use crate::dispatch::EndpointHandler;
use crate::upstream::{bounded, AskInput, InferenceBackend};

pub const DEFAULT_ASK_MODEL: &str = "gemini-pro";

/// Queries longer than this are cut in logs.
const LOG_QUERY_CHARS: usize = 100;

pub struct AskService {
    backend: Arc<dyn InferenceBackend>,
    timeout: Duration,
}

impl AskService {
    pub fn new(backend: Arc<dyn InferenceBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn shape() -> BodyShape {
        BodyShape::empty()
            .field(FieldSpec::required("query", FieldType::Text))
            .field(FieldSpec::optional("context", FieldType::Text, ""))
            .field(FieldSpec::optional("model", FieldType::Text, DEFAULT_ASK_MODEL))
    }
}

#[async_trait]
impl EndpointHandler for AskService {
    async fn handle(&self, body: DecodedBody) -> Result<Reply> {
        let query = body.text("query")?;
        let model = body.text("model")?;
        let preview: String = query.chars().take(LOG_QUERY_CHARS).collect();
        tracing::info!(query = %preview, model, "RAG query");

        let input = AskInput {
            query: query.to_string(),
            context: body.text("context")?.to_string(),
            model: model.to_string(),
        };
        let answer = bounded(self.timeout, self.backend.ask(input)).await?;
        if answer.sources.is_empty() {
            return Err(GravityError::Upstream("backend answer has no sources".into()));
        }

        Ok(Reply::new("Question answered successfully")
            .field("answer", answer.text)
            .field("confidence", answer.confidence)
            .field("sources", answer.sources)
            .field("model", model)
            .field("query", query))
    }
}
