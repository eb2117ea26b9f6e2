pub mod gemini;
pub mod provider;
#[cfg(test)]
pub mod testing;
pub mod types;

pub use gemini::GeminiProvider;
pub use provider::LlmProvider;
pub use types::{ChatMessage, ChatRequest};
