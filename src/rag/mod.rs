//! Document ingestion and retrieval-augmented answering.

pub mod chunker;
pub mod index;
pub mod indexer;
pub mod pipeline;
pub mod prompt;

pub use chunker::Chunks;
pub use index::{IndexEntry, ScoredChunk, VectorIndex};
pub use indexer::IndexManager;
pub use pipeline::{RagPipeline, MAX_TOKEN_LIMIT};
