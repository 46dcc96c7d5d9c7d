// OpenAI-compatible client implementation (chat completions)

use crate::extract::extract_text;
use crate::traits::{CompletionClient, GenerationError, GenerationParams};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI client (HTTP direct, no SDK)
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenAIClient {
    /// Create new client with API key and model name
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
            model: model.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build chat completion request payload with the prompt as a single user turn
    fn build_chat_request(&self, prompt: &str, params: GenerationParams) -> Value {
        let mut request = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "stream": false,
        });

        // o1 and gpt-5 models use different parameter names
        let is_reasoning_model = self.model.starts_with("o1") || self.model.starts_with("gpt-5");
        let token_field = if is_reasoning_model {
            "max_completion_tokens"
        } else {
            "max_tokens"
        };

        if let Some(obj) = request.as_object_mut() {
            // o1 and gpt-5 models don't support temperature
            if !is_reasoning_model {
                obj.insert("temperature".to_string(), serde_json::json!(params.temperature));
            }
            obj.insert(token_field.to_string(), serde_json::json!(params.max_tokens));
        }

        request
    }
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, GenerationError> {
        let payload = self.build_chat_request(prompt, params);

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::TransportFailure(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let raw: Value = response.json().await?;

        extract_text(&raw).ok_or_else(|| {
            tracing::warn!(model = %self.model, "OpenAI response carried no text");
            GenerationError::EmptyOutput
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_uses_max_tokens_for_chat_models() {
        let client = OpenAIClient::new("test-key", "gpt-4o-mini").unwrap();
        let payload = client.build_chat_request("hello", GenerationParams::new(0.3, 200));

        assert_eq!(payload["model"], "gpt-4o-mini");
        assert_eq!(payload["messages"][0]["content"], "hello");
        assert_eq!(payload["max_tokens"], 200);
        assert!(payload.get("temperature").is_some());
    }

    #[test]
    fn test_reasoning_models_drop_temperature() {
        let client = OpenAIClient::new("test-key", "gpt-5-mini").unwrap();
        let payload = client.build_chat_request("hello", GenerationParams::new(0.9, 100));

        assert!(payload.get("temperature").is_none());
        assert_eq!(payload["max_completion_tokens"], 100);
    }
}
