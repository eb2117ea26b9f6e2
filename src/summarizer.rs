//! One-shot summarization of ingested document text.

use std::sync::Arc;

use tracing::error;

use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

pub const SUMMARY_FAILURE_NOTICE: &str = "An error occurred while generating the summary.";
pub const CSV_SUMMARY_FAILURE_NOTICE: &str =
    "An error occurred while generating the CSV summary.";

/// Produces a short summary of a document's text. Provider failures never
/// propagate; the caller gets a fixed notice instead, since a summary is a
/// courtesy rather than a required step.
pub struct Summarizer {
    provider: Arc<dyn LlmProvider>,
    temperature: f64,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn LlmProvider>, temperature: f64) -> Self {
        Self {
            provider,
            temperature,
        }
    }

    /// Summarize free-running prose.
    pub async fn summarize(&self, text: &str) -> String {
        self.run(text, SUMMARY_FAILURE_NOTICE).await
    }

    /// Summarize the flattened text of a tabular document.
    pub async fn summarize_tabular(&self, text: &str) -> String {
        self.run(text, CSV_SUMMARY_FAILURE_NOTICE).await
    }

    async fn run(&self, text: &str, failure_notice: &str) -> String {
        let prompt = format!("Summarize the following text:\n\n{text}\n\nSUMMARY:");
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)])
            .with_temperature(self.temperature);

        match self.provider.chat(request).await {
            Ok(summary) => summary.trim().to_string(),
            Err(err) => {
                error!(error = %err, "summary generation failed");
                failure_notice.to_string()
            }
        }
    }
}
