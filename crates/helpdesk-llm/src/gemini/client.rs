// Gemini-specific client implementation

use crate::extract::extract_text;
use crate::traits::{CompletionClient, GenerationError, GenerationParams};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client (HTTP direct, `generateContent` endpoint)
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create new client with API key and model name (e.g. `gemini-2.5-flash`)
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&api_key).context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: GEMINI_API_BASE.to_string(),
            model: normalize_model(model.into()),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build generateContent request payload
    fn build_request(&self, prompt: &str, params: GenerationParams) -> Value {
        serde_json::json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }],
                }
            ],
            "generationConfig": {
                "temperature": params.temperature,
                "maxOutputTokens": params.max_tokens,
            },
        })
    }
}

/// Accept both `gemini-2.5-flash` and `models/gemini-2.5-flash`
fn normalize_model(model: String) -> String {
    match model.strip_prefix("models/") {
        Some(stripped) => stripped.to_string(),
        None => model,
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, GenerationError> {
        let payload = self.build_request(prompt, params);

        let response = self
            .http_client
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::TransportFailure(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let raw: Value = response.json().await?;

        extract_text(&raw).ok_or_else(|| {
            tracing::warn!(model = %self.model, "Gemini response carried no text");
            GenerationError::EmptyOutput
        })
    }
}
