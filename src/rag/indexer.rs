//! Builds and queries the persisted vector index.
//!
//! Embedding requests go out in fixed-size batches. A batch that fails with a
//! quota error is retried after a flat delay; any other provider error aborts
//! the build immediately.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::core::errors::AssistantError;
use crate::llm::LlmProvider;
use crate::rag::index::{IndexEntry, ScoredChunk, VectorIndex};

const EMBED_RETRY_ATTEMPTS: u32 = 3;
const EMBED_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Owns the index artifact on disk. Builds rewrite it wholesale under a write
/// lock; searches load it under a read lock, so a search never observes a
/// half-written artifact.
#[derive(Clone)]
pub struct IndexManager {
    provider: Arc<dyn LlmProvider>,
    index_path: PathBuf,
    embedding_model: String,
    lock: Arc<RwLock<()>>,
}

impl IndexManager {
    pub fn new(provider: Arc<dyn LlmProvider>, index_path: PathBuf, embedding_model: &str) -> Self {
        Self {
            provider,
            index_path,
            embedding_model: embedding_model.to_string(),
            lock: Arc::new(RwLock::new(())),
        }
    }

    /// Embed `chunks` in batches of `batch_size` and replace the artifact on
    /// disk with the resulting index.
    pub async fn build(&self, chunks: &[String], batch_size: usize) -> Result<(), AssistantError> {
        if chunks.is_empty() {
            return Err(AssistantError::InvalidArgument(
                "cannot build an index from zero chunks".to_string(),
            ));
        }
        if batch_size == 0 {
            return Err(AssistantError::InvalidArgument(
                "batch size must be at least 1".to_string(),
            ));
        }

        let mut index = VectorIndex::new(&self.embedding_model);
        for batch in chunks.chunks(batch_size) {
            let embeddings = self.embed_batch_with_retry(batch).await?;
            let mut partial = VectorIndex::new(&self.embedding_model);
            for (content, embedding) in batch.iter().zip(embeddings) {
                partial.push(IndexEntry {
                    content: content.clone(),
                    embedding,
                });
            }
            index.merge(partial);
        }

        let _guard = self.lock.write().await;
        index.save(&self.index_path).await?;
        info!(
            chunks = index.len(),
            path = %self.index_path.display(),
            "vector index rebuilt"
        );
        Ok(())
    }

    /// Search the persisted index for the `limit` chunks closest to `query`.
    /// The artifact is loaded before the query is embedded, so a missing
    /// index fails fast without touching the provider.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, AssistantError> {
        let index = {
            let _guard = self.lock.read().await;
            VectorIndex::load(&self.index_path, &self.embedding_model).await?
        };

        let query = query.to_string();
        let embeddings = self.provider.embed(std::slice::from_ref(&query)).await?;
        let query_embedding = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::provider("provider returned no query embedding"))?;

        Ok(index.search(&query_embedding, limit))
    }

    async fn embed_batch_with_retry(
        &self,
        batch: &[String],
    ) -> Result<Vec<Vec<f32>>, AssistantError> {
        let mut last_error = AssistantError::provider("embedding was never attempted");

        for attempt in 1..=EMBED_RETRY_ATTEMPTS {
            match self.embed_batch(batch).await {
                Ok(embeddings) => return Ok(embeddings),
                Err(err @ AssistantError::QuotaExceeded(_)) => {
                    warn!(
                        attempt,
                        max_attempts = EMBED_RETRY_ATTEMPTS,
                        error = %err,
                        "embedding batch hit provider quota"
                    );
                    last_error = err;
                    if attempt < EMBED_RETRY_ATTEMPTS {
                        tokio::time::sleep(EMBED_RETRY_DELAY).await;
                    }
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error)
    }

    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, AssistantError> {
        let embeddings = self.provider.embed(batch).await?;
        if embeddings.len() != batch.len() {
            return Err(AssistantError::provider(format!(
                "provider returned {} embeddings for {} inputs",
                embeddings.len(),
                batch.len()
            )));
        }
        Ok(embeddings)
    }
}
