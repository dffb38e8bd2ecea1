//! Seam for the external inference backend.
//!
//! Handlers never talk to a backend directly; they go through
//! [`bounded`], which enforces the configured deadline and maps backend
//! failures to `UPSTREAM_ERROR`. Dropping the returned future (client went
//! away) drops the backend call with it.

pub mod placeholder;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use gravity_core::error::{GravityError, Result};

pub use placeholder::PlaceholderBackend;

/// Failure reported by a backend implementation.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("backend rejected request: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone)]
pub struct EmbedInput {
    pub text: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct Embedding {
    pub id: String,
    pub dimensions: u32,
}

#[derive(Debug, Clone)]
pub struct AskInput {
    pub query: String,
    pub context: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub confidence: f64,
    /// Ordered by relevance.
    pub sources: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AnalyzeInput {
    pub data: serde_json::Map<String, serde_json::Value>,
    pub analysis_type: String,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub id: String,
    pub insights: Vec<String>,
    pub confidence: f64,
    pub processing_time_ms: u64,
}

/// External AI collaborator (embeddings, RAG answers, insights).
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    fn name(&self) -> &'static str;
    async fn embed(&self, input: EmbedInput) -> std::result::Result<Embedding, BackendError>;
    async fn ask(&self, input: AskInput) -> std::result::Result<Answer, BackendError>;
    async fn analyze(&self, input: AnalyzeInput) -> std::result::Result<Analysis, BackendError>;
}

/// Run a backend call under a deadline.
pub async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, BackendError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(e)) => Err(GravityError::Upstream(e.to_string())),
        Err(_) => Err(GravityError::Upstream(format!(
            "backend call timed out after {} ms",
            timeout.as_millis()
        ))),
    }
}
