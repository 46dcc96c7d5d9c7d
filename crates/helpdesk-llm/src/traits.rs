use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// A single "generate text from a prompt" capability.
///
/// Implementations never retry and never let transport errors escape as
/// anything other than a [`GenerationError`]. Retry policy belongs to callers.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, GenerationError>;
}

/// Sampling parameters for one generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationParams {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = temp;
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::new(0.7, 1024)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Completion transport failure: {0}")]
    TransportFailure(String),

    #[error("Completion returned no extractable text")]
    EmptyOutput,

    #[error("Completion timed out after {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::TransportFailure(err.to_string())
    }
}
