//! Scripted provider for exercising batching, retry, and prompt composition
//! without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::provider::LlmProvider;
use super::types::ChatRequest;
use crate::core::errors::AssistantError;

pub struct ScriptedProvider {
    chat_replies: Mutex<VecDeque<String>>,
    chat_failures: Mutex<u32>,
    quota_failures: Mutex<u32>,
    embed_failures: Mutex<u32>,
    embed_attempts: Mutex<usize>,
    embed_batches: Mutex<Vec<usize>>,
    chat_prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            chat_replies: Mutex::new(VecDeque::new()),
            chat_failures: Mutex::new(0),
            quota_failures: Mutex::new(0),
            embed_failures: Mutex::new(0),
            embed_attempts: Mutex::new(0),
            embed_batches: Mutex::new(Vec::new()),
            chat_prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a chat reply; when the queue is empty, chat answers with a
    /// fixed placeholder.
    pub fn push_chat_reply(&self, reply: &str) {
        self.chat_replies.lock().unwrap().push_back(reply.to_string());
    }

    /// Make the next `times` embed calls fail with a quota signal.
    pub fn fail_embeddings_with_quota(&self, times: u32) {
        *self.quota_failures.lock().unwrap() = times;
    }

    /// Make the next `times` embed calls fail with a plain provider error.
    pub fn fail_embeddings(&self, times: u32) {
        *self.embed_failures.lock().unwrap() = times;
    }

    /// Make the next `times` chat calls fail with a provider error.
    pub fn fail_chat(&self, times: u32) {
        *self.chat_failures.lock().unwrap() = times;
    }

    /// Sizes of the embed batches received so far, in call order. Only
    /// successful calls are recorded.
    pub fn embed_batches(&self) -> Vec<usize> {
        self.embed_batches.lock().unwrap().clone()
    }

    /// Total embed calls received, failures included.
    pub fn embed_attempts(&self) -> usize {
        *self.embed_attempts.lock().unwrap()
    }

    /// Full prompts received by chat so far, in call order.
    pub fn chat_prompts(&self) -> Vec<String> {
        self.chat_prompts.lock().unwrap().clone()
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_prompts.lock().unwrap().len()
    }

    /// Deterministic text embedding: identical texts map to identical
    /// vectors, so a verbatim query scores 1.0 against its own chunk.
    pub fn embedding_for(text: &str) -> Vec<f32> {
        let mut dims = vec![0.0f32; 8];
        for byte in text.bytes() {
            dims[(byte % 8) as usize] += 1.0;
        }
        dims
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, AssistantError> {
        let prompt = request
            .messages
            .iter()
            .map(|m| m.content.clone())
            .collect::<Vec<_>>()
            .join("\n");
        self.chat_prompts.lock().unwrap().push(prompt);

        {
            let mut failures = self.chat_failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(AssistantError::Provider("scripted chat failure".to_string()));
            }
        }

        Ok(self
            .chat_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "scripted reply".to_string()))
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AssistantError> {
        *self.embed_attempts.lock().unwrap() += 1;

        {
            let mut failures = self.quota_failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(AssistantError::QuotaExceeded("scripted quota".to_string()));
            }
        }
        {
            let mut failures = self.embed_failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(AssistantError::Provider("scripted embed failure".to_string()));
            }
        }

        self.embed_batches.lock().unwrap().push(inputs.len());
        Ok(inputs.iter().map(|text| Self::embedding_for(text)).collect())
    }
}
