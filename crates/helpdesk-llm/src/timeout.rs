use crate::traits::{CompletionClient, GenerationError, GenerationParams};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Decorator that imposes a deadline on every generation call.
///
/// Expiry surfaces as [`GenerationError::Timeout`]; the in-flight request is
/// dropped, not cancelled upstream.
pub struct TimeoutClient {
    inner: Arc<dyn CompletionClient>,
    timeout: Duration,
}

impl TimeoutClient {
    pub fn new(inner: Arc<dyn CompletionClient>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl CompletionClient for TimeoutClient {
    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, GenerationError> {
        match tokio::time::timeout(self.timeout, self.inner.generate(prompt, params)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "Generation call timed out");
                Err(GenerationError::Timeout(self.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowClient {
        delay: Duration,
    }

    #[async_trait]
    impl CompletionClient for SlowClient {
        async fn generate(
            &self,
            prompt: &str,
            _params: GenerationParams,
        ) -> Result<String, GenerationError> {
            tokio::time::sleep(self.delay).await;
            Ok(prompt.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let client = TimeoutClient::new(
            Arc::new(SlowClient { delay: Duration::from_millis(1) }),
            Duration::from_secs(5),
        );

        let text = client.generate("ok", GenerationParams::default()).await.unwrap();
        assert_eq!(text, "OK");
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let timeout = Duration::from_millis(20);
        let client = TimeoutClient::new(
            Arc::new(SlowClient { delay: Duration::from_secs(5) }),
            timeout,
        );

        let err = client.generate("late", GenerationParams::default()).await.unwrap_err();
        assert_eq!(err, GenerationError::Timeout(timeout));
    }
}
