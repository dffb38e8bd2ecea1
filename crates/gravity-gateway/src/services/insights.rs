use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use gravity_core::error::{GravityError, Result};
use gravity_core::protocol::{BodyShape, DecodedBody, FieldSpec, FieldType, Reply};

use crate::dispatch::EndpointHandler;
use crate::upstream::{bounded, AnalyzeInput, InferenceBackend};

pub const DEFAULT_ANALYSIS_TYPE: &str = "general";

pub struct InsightsService {
    backend: Arc<dyn InferenceBackend>,
    timeout: Duration,
}

impl InsightsService {
    pub fn new(backend: Arc<dyn InferenceBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn shape() -> BodyShape {
        BodyShape::empty()
            .field(FieldSpec::required("data", FieldType::Mapping))
            .field(FieldSpec::optional("analysis_type", FieldType::Text, DEFAULT_ANALYSIS_TYPE))
    }
}

#[async_trait]
impl EndpointHandler for InsightsService {
    async fn handle(&self, body: DecodedBody) -> Result<Reply> {
        let analysis_type = body.text("analysis_type")?;
        tracing::info!(analysis_type, "insights analysis request");

        let input = AnalyzeInput {
            data: body.mapping("data")?.clone(),
            analysis_type: analysis_type.to_string(),
        };
        let analysis = bounded(self.timeout, self.backend.analyze(input)).await?;
        if analysis.insights.is_empty() {
            return Err(GravityError::Upstream("backend returned no insights".into()));
        }

        Ok(Reply::new("Insights analysis completed")
            .field("analysis_id", analysis.id)
            .field("type", analysis_type)
            .field("insights", analysis.insights)
            .field("confidence", analysis.confidence)
            .field("processing_time_ms", analysis.processing_time_ms))
    }
}
