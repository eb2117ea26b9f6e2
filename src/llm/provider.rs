use async_trait::async_trait;

use super::types::ChatRequest;
use crate::core::errors::AssistantError;

/// External model services the assistant talks to: a generative chat model
/// and an embedding model, both behind network calls.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// provider name for logging (e.g. "gemini")
    fn name(&self) -> &str;

    /// chat completion (non-streaming)
    async fn chat(&self, request: ChatRequest) -> Result<String, AssistantError>;

    /// one embedding per input text, in input order
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AssistantError>;
}
