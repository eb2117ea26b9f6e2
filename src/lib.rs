//! Conversational document assistant core.
//!
//! Ingests documents into a persisted vector index and answers questions
//! about them with retrieval-augmented generation, keeping per-conversation
//! memory, an LRU answer cache, and a document summarizer. Embeddings and
//! chat completions come from a remote provider behind the [`llm::LlmProvider`]
//! trait; everything else is local.

pub mod assistant;
pub mod cache;
pub mod core;
pub mod document;
pub mod llm;
pub mod logging;
pub mod memory;
pub mod rag;
pub mod summarizer;
pub mod text;

pub use crate::core::config::{AppPaths, AssistantConfig};
pub use crate::core::errors::AssistantError;
pub use assistant::Assistant;
pub use llm::{GeminiProvider, LlmProvider};
pub use memory::{ConversationMemory, Turn};
pub use rag::{IndexManager, RagPipeline};
pub use summarizer::Summarizer;
