use async_trait::async_trait;

use super::{
    Analysis, AnalyzeInput, Answer, AskInput, BackendError, EmbedInput, Embedding,
    InferenceBackend,
};

/// Backend stand-in returning fixed contract values. No inference happens.
#[derive(Debug, Default)]
pub struct PlaceholderBackend;

impl PlaceholderBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InferenceBackend for PlaceholderBackend {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    async fn embed(&self, _input: EmbedInput) -> Result<Embedding, BackendError> {
        Ok(Embedding {
            id: "stub_embedding_456".into(),
            dimensions: 768,
        })
    }

    async fn ask(&self, _input: AskInput) -> Result<Answer, BackendError> {
        Ok(Answer {
            text: "This is a placeholder answer from the RAG system.".into(),
            confidence: 0.85,
            sources: vec!["doc_1".into(), "doc_2".into()],
        })
    }

    async fn analyze(&self, _input: AnalyzeInput) -> Result<Analysis, BackendError> {
        Ok(Analysis {
            id: "stub_analysis_789".into(),
            insights: vec![
                "Sample insight 1: Data shows positive trend".into(),
                "Sample insight 2: Recommendation for improvement".into(),
            ],
            confidence: 0.92,
            processing_time_ms: 150,
        })
    }
}
