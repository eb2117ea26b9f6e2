use std::env;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

use super::provider::LlmProvider;
use super::types::ChatRequest;
use crate::core::config::ProviderConfig;
use crate::core::errors::AssistantError;

/// Google Generative Language REST client.
///
/// Chat goes through `generateContent`, embeddings through
/// `batchEmbedContents`. HTTP 429 maps to `QuotaExceeded` so the index
/// builder can tell a rate-limit apart from a hard failure.
#[derive(Clone)]
pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig, api_key: String) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            client: Client::new(),
        }
    }

    /// Construct from configuration, reading the API key from the
    /// environment variable the config names.
    pub fn from_env(config: &ProviderConfig) -> Result<Self, AssistantError> {
        let api_key = env::var(&config.api_key_env).map_err(|_| {
            AssistantError::InvalidArgument(format!(
                "environment variable {} is not set",
                config.api_key_env
            ))
        })?;
        Ok(Self::new(config, api_key))
    }

    async fn error_from_response(res: reqwest::Response, action: &str) -> AssistantError {
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if status == StatusCode::TOO_MANY_REQUESTS {
            AssistantError::QuotaExceeded(text)
        } else {
            AssistantError::Provider(format!("Gemini {action} error ({status}): {text}"))
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, AssistantError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.chat_model, self.api_key
        );

        let contents: Vec<Value> = request
            .messages
            .iter()
            .map(|message| {
                // Gemini names the assistant role "model".
                let role = if message.role == "assistant" {
                    "model"
                } else {
                    message.role.as_str()
                };
                json!({ "role": role, "parts": [{ "text": message.content }] })
            })
            .collect();

        let mut body = json!({ "contents": contents });
        if let Some(obj) = body.as_object_mut() {
            let mut generation = serde_json::Map::new();
            if let Some(t) = request.temperature {
                generation.insert("temperature".to_string(), json!(t));
            }
            if let Some(m) = request.max_tokens {
                generation.insert("maxOutputTokens".to_string(), json!(m));
            }
            if !generation.is_empty() {
                obj.insert("generationConfig".to_string(), Value::Object(generation));
            }
        }

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(AssistantError::provider)?;

        if !res.status().is_success() {
            return Err(Self::error_from_response(res, "chat").await);
        }

        let payload: Value = res.json().await.map_err(AssistantError::provider)?;
        let content = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        debug!("chat completion returned {} chars", content.len());
        Ok(content)
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AssistantError> {
        let url = format!(
            "{}/v1beta/{}:batchEmbedContents?key={}",
            self.base_url, self.embedding_model, self.api_key
        );

        let requests: Vec<Value> = inputs
            .iter()
            .map(|text| {
                json!({
                    "model": self.embedding_model,
                    "content": { "parts": [{ "text": text }] },
                })
            })
            .collect();

        let res = self
            .client
            .post(&url)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(AssistantError::provider)?;

        if !res.status().is_success() {
            return Err(Self::error_from_response(res, "embed").await);
        }

        let payload: Value = res.json().await.map_err(AssistantError::provider)?;

        let mut embeddings = Vec::new();
        if let Some(data) = payload["embeddings"].as_array() {
            for item in data {
                if let Some(vals) = item["values"].as_array() {
                    let vec: Vec<f32> = vals
                        .iter()
                        .filter_map(|v| v.as_f64().map(|f| f as f32))
                        .collect();
                    embeddings.push(vec);
                }
            }
        }

        if embeddings.len() != inputs.len() {
            return Err(AssistantError::Provider(format!(
                "Gemini returned {} embeddings for {} inputs",
                embeddings.len(),
                inputs.len()
            )));
        }

        Ok(embeddings)
    }
}
