// Configuration layer for provider-agnostic completion client creation
// This module provides a factory pattern for creating completion clients from configuration

use crate::timeout::TimeoutClient;
use crate::traits::CompletionClient;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Type of LLM provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[default]
    Gemini,
    OpenAI,
}

/// Configuration for the Gemini provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL (optional, defaults to the public generativelanguage endpoint)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Configuration for an OpenAI-compatible provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL for OpenAI API (optional, defaults to https://api.openai.com/v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Provider-specific configuration details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderDetails {
    Gemini(GeminiConfig),
    OpenAI(OpenAIConfig),
}

/// Complete provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(flatten)]
    pub details: ProviderDetails,
}

impl ProviderConfig {
    /// Create Gemini provider config
    pub fn gemini(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            details: ProviderDetails::Gemini(GeminiConfig::new(api_key, model)),
        }
    }

    /// Create OpenAI provider config
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            details: ProviderDetails::OpenAI(OpenAIConfig::new(api_key, model)),
        }
    }

    /// Override the provider base URL (proxies, local gateways, tests)
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        match &mut self.details {
            ProviderDetails::Gemini(cfg) => cfg.base_url = base_url,
            ProviderDetails::OpenAI(cfg) => cfg.base_url = base_url,
        }
        self
    }

    /// Get the provider type
    pub fn provider_type(&self) -> ProviderType {
        match self.details {
            ProviderDetails::Gemini(_) => ProviderType::Gemini,
            ProviderDetails::OpenAI(_) => ProviderType::OpenAI,
        }
    }
}

/// Factory for creating completion clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a completion client from provider configuration
    pub fn create_client(config: ProviderConfig) -> Result<Arc<dyn CompletionClient>> {
        match config.details {
            ProviderDetails::Gemini(gemini_config) => {
                let mut client =
                    crate::gemini::GeminiClient::new(gemini_config.api_key, gemini_config.model)?;
                if let Some(base_url) = gemini_config.base_url {
                    client = client.with_base_url(base_url);
                }
                Ok(Arc::new(client))
            }
            ProviderDetails::OpenAI(openai_config) => {
                let mut client =
                    crate::openai::OpenAIClient::new(openai_config.api_key, openai_config.model)?;
                if let Some(base_url) = openai_config.base_url {
                    client = client.with_base_url(base_url);
                }
                Ok(Arc::new(client))
            }
        }
    }

    /// Create a completion client wrapped in an explicit per-call deadline
    pub fn create_client_with_timeout(
        config: ProviderConfig,
        timeout: Duration,
    ) -> Result<Arc<dyn CompletionClient>> {
        let inner = Self::create_client(config)?;
        Ok(Arc::new(TimeoutClient::new(inner, timeout)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_config() {
        let config = ProviderConfig::gemini("test-key", "gemini-2.5-flash");
        assert_eq!(config.provider_type(), ProviderType::Gemini);
    }

    #[test]
    fn test_openai_config() {
        let config = ProviderConfig::openai("test-key", "gpt-4o-mini");
        assert_eq!(config.provider_type(), ProviderType::OpenAI);
    }

    #[test]
    fn test_base_url_override() {
        let config = ProviderConfig::openai("test-key", "gpt-4o-mini")
            .with_base_url(Some("http://localhost:11434/v1".to_string()));

        match config.details {
            ProviderDetails::OpenAI(cfg) => {
                assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:11434/v1"))
            }
            _ => panic!("expected OpenAI details"),
        }
    }

    #[test]
    fn test_serde_tagged_shape() {
        let json = r#"{"type":"gemini","api_key":"k","model":"gemini-2.5-flash"}"#;
        let config: ProviderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.provider_type(), ProviderType::Gemini);
    }

    #[test]
    fn test_factory_builds_both_providers() {
        assert!(ClientFactory::create_client(ProviderConfig::gemini("k", "gemini-2.5-flash")).is_ok());
        assert!(ClientFactory::create_client_with_timeout(
            ProviderConfig::openai("k", "gpt-4o-mini"),
            Duration::from_secs(30),
        )
        .is_ok());
    }
}
