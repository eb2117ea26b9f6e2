//! In-memory vector index with a single persisted JSON artifact.
//!
//! The whole index lives in one file, rewritten wholesale on every build.
//! Search is brute-force cosine similarity over all entries.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::AssistantError;

pub const INDEX_FORMAT_VERSION: u32 = 1;

/// One indexed chunk with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub content: String,
    pub embedding: Vec<f32>,
}

/// A chunk returned from similarity search.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub content: String,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    pub version: u32,
    pub embedding_model: String,
    pub built_at: DateTime<Utc>,
    pub entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn new(embedding_model: &str) -> Self {
        Self {
            version: INDEX_FORMAT_VERSION,
            embedding_model: embedding_model.to_string(),
            built_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: IndexEntry) {
        self.entries.push(entry);
    }

    /// Append another partial index, preserving insertion order.
    pub fn merge(&mut self, other: VectorIndex) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `limit` entries by cosine similarity, highest first. Equal scores
    /// keep insertion order (the sort is stable).
    pub fn search(&self, query_embedding: &[f32], limit: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                content: entry.content.clone(),
                score: cosine_similarity(query_embedding, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);
        scored
    }

    /// Persist the index, replacing any prior artifact. The write goes to a
    /// temp file in the same directory and is renamed into place, so a
    /// concurrent reader sees either the old artifact or the new one.
    pub async fn save(&self, path: &Path) -> Result<(), AssistantError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(AssistantError::storage)?;
        }

        let json = serde_json::to_vec(self).map_err(AssistantError::storage)?;
        let tmp = path.with_extension(format!("tmp-{}", uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(AssistantError::storage)?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(AssistantError::storage)?;
        Ok(())
    }

    /// Load the persisted artifact. A missing file is `IndexNotFound`; a
    /// malformed one, or one built with a different format version or
    /// embedding model, is a storage error.
    pub async fn load(path: &Path, embedding_model: &str) -> Result<Self, AssistantError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(AssistantError::IndexNotFound);
            }
            Err(err) => return Err(AssistantError::storage(err)),
        };

        let index: VectorIndex =
            serde_json::from_slice(&bytes).map_err(AssistantError::storage)?;

        if index.version != INDEX_FORMAT_VERSION {
            return Err(AssistantError::Storage(format!(
                "unsupported index version {}",
                index.version
            )));
        }
        if index.embedding_model != embedding_model {
            return Err(AssistantError::Storage(format!(
                "index was built with embedding model {}, expected {}",
                index.embedding_model, embedding_model
            )));
        }

        Ok(index)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denom = norm_a * norm_b;

    if denom <= f32::EPSILON {
        0.0
    } else {
        dot / denom
    }
}
