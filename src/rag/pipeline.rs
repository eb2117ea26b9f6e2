//! Retrieval-augmented answering: retrieve, compose, generate.

use std::sync::Arc;

use tracing::debug;

use crate::core::errors::AssistantError;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::memory::Turn;
use crate::rag::indexer::IndexManager;
use crate::rag::prompt;

/// Questions longer than this many whitespace-separated words are rejected
/// before any retrieval or generation happens.
pub const MAX_TOKEN_LIMIT: usize = 2048;

pub struct RagPipeline {
    provider: Arc<dyn LlmProvider>,
    indexer: IndexManager,
    top_k: usize,
    temperature: f64,
}

impl RagPipeline {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        indexer: IndexManager,
        top_k: usize,
        temperature: f64,
    ) -> Self {
        Self {
            provider,
            indexer,
            top_k,
            temperature,
        }
    }

    /// Answer `question` against the persisted index, grounding the model in
    /// the retrieved chunks and the conversation so far.
    pub async fn answer(&self, question: &str, history: &[Turn]) -> Result<String, AssistantError> {
        let word_count = question.split_whitespace().count();
        if word_count > MAX_TOKEN_LIMIT {
            return Err(AssistantError::TokenLimitExceeded(MAX_TOKEN_LIMIT));
        }

        let chunks = self.indexer.search(question, self.top_k).await?;
        debug!(retrieved = chunks.len(), "composing answer prompt");

        let prompt = prompt::compose(
            &prompt::format_history(history),
            &prompt::format_context(&chunks),
            question,
        );

        let request = ChatRequest::new(vec![ChatMessage::user(prompt)])
            .with_temperature(self.temperature);
        let reply = self.provider.chat(request).await?;
        Ok(reply.trim().to_string())
    }
}
