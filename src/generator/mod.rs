mod gemini;
mod parse;

pub use gemini::GeminiClient;
pub use parse::plan_from_response;

use crate::config::GeminiConfig;
use crate::error::GenerationError;
use async_trait::async_trait;
use std::sync::Arc;

/// Boundary to the external generative service. Implementations send a
/// system instruction plus one user message and return the raw text reply.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError>;
}

/// Create the production client. Fails before any network call when the
/// credential is missing.
pub fn create_client(config: &GeminiConfig) -> Result<Arc<dyn TextCompletion>, GenerationError> {
    Ok(Arc::new(GeminiClient::from_env(config)?))
}
