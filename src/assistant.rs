//! The conversational assistant: routes user input, keeps the conversation
//! log, and ties ingestion, retrieval, caching, and summarization together.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::cache::AnswerCache;
use crate::core::config::{AppPaths, AssistantConfig, ChunkingConfig};
use crate::core::errors::AssistantError;
use crate::document::{DocumentSource, SourceKind};
use crate::llm::LlmProvider;
use crate::memory::{ConversationMemory, Turn};
use crate::rag::chunker;
use crate::rag::indexer::IndexManager;
use crate::rag::pipeline::RagPipeline;
use crate::rag::prompt;
use crate::summarizer::Summarizer;

pub const FALLBACK_REPLY: &str = "I'm sorry, I didn't understand that.";
pub const DEFAULT_SUMMARY_REPLY: &str = "Summary of the content.";

/// One assistant per conversation. `respond` never returns an error: every
/// failure is rendered as the reply text a person would read.
pub struct Assistant {
    pipeline: RagPipeline,
    indexer: IndexManager,
    summarizer: Summarizer,
    memory: ConversationMemory,
    cache: AnswerCache,
    chunking: ChunkingConfig,
    batch_size: usize,
}

impl Assistant {
    pub fn new(provider: Arc<dyn LlmProvider>, paths: &AppPaths, config: AssistantConfig) -> Self {
        let indexer = IndexManager::new(
            provider.clone(),
            paths.index_path.clone(),
            &config.provider.embedding_model,
        );
        let pipeline = RagPipeline::new(
            provider.clone(),
            indexer.clone(),
            config.retrieval.top_k,
            config.provider.temperature,
        );
        let summarizer = Summarizer::new(provider, config.provider.temperature);

        Self {
            pipeline,
            indexer,
            summarizer,
            memory: ConversationMemory::new(&config.memory),
            cache: AnswerCache::new(config.cache.capacity),
            chunking: config.chunking,
            batch_size: config.retrieval.batch_size,
        }
    }

    /// Handle one user message and return the reply. The turn is recorded
    /// before routing so that prompts can refer to the message being
    /// answered, and the reply is filled in afterwards.
    pub async fn respond(&mut self, input: &str) -> String {
        self.memory.add_message(input, None);
        let reply = self.generate_reply(input).await;
        if let Err(err) = self.memory.update_last(reply.as_str()) {
            warn!(error = %err, "could not record the reply");
        }
        reply
    }

    /// Ingest a document: extract its text, chunk it, rebuild the vector
    /// index, and return a short summary of the content. Failures come back
    /// as readable text, same as `respond`.
    pub async fn ingest_document(&self, source: &dyn DocumentSource) -> String {
        match self.try_ingest(source).await {
            Ok(summary) => summary,
            Err(
                err @ (AssistantError::InvalidArgument(_) | AssistantError::TokenLimitExceeded(_)),
            ) => {
                warn!(error = %err, "document rejected");
                format!("Error: {err}")
            }
            Err(err) => {
                error!(error = %err, "document ingestion failed");
                format!("An unexpected error occurred during processing: {err}")
            }
        }
    }

    pub fn history(&self) -> &[Turn] {
        self.memory.get_history()
    }

    async fn generate_reply(&self, input: &str) -> String {
        if Self::is_question(input) {
            self.answer_question(input).await
        } else if Self::is_summarization_request(input) {
            self.summarize_conversation().await
        } else {
            FALLBACK_REPLY.to_string()
        }
    }

    fn is_question(input: &str) -> bool {
        input.ends_with('?')
    }

    fn is_summarization_request(input: &str) -> bool {
        input.to_lowercase().contains("summarize")
    }

    async fn answer_question(&self, question: &str) -> String {
        let history = self.memory.prompt_window().to_vec();
        let result = self
            .cache
            .get_or_compute(question, || self.pipeline.answer(question, &history))
            .await;

        match result {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %err, "question answering failed");
                err.to_user_message()
            }
        }
    }

    /// Summarize the turns before the current one. Asking for a summary with
    /// nothing said yet gets a fixed placeholder.
    async fn summarize_conversation(&self) -> String {
        let history = self.memory.get_history();
        let prior = match history.split_last() {
            Some((_, prior)) => prior,
            None => history,
        };
        if prior.is_empty() {
            return DEFAULT_SUMMARY_REPLY.to_string();
        }

        let transcript = prompt::format_history(prior);
        self.summarizer.summarize(&transcript).await
    }

    async fn try_ingest(&self, source: &dyn DocumentSource) -> Result<String, AssistantError> {
        let text = source.extract().await?;
        let chunks: Vec<String> =
            chunker::split(&text, self.chunking.max_size, self.chunking.overlap)?.collect();
        self.indexer.build(&chunks, self.batch_size).await?;
        info!(kind = ?source.kind(), chunks = chunks.len(), "document ingested");

        let summary = match source.kind() {
            SourceKind::Csv => self.summarizer.summarize_tabular(&text).await,
            SourceKind::Pdf | SourceKind::Arxiv => self.summarizer.summarize(&text).await,
        };
        Ok(summary)
    }
}
