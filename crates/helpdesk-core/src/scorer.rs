use std::sync::Arc;

use helpdesk_llm::{CompletionClient, GenerationParams};
use helpdesk_types::QualityRating;

use crate::prompts::score_prompt;

/// Short textual quality judgment of a final answer
#[derive(Clone)]
pub struct QualityScorer {
    client: Arc<dyn CompletionClient>,
    params: GenerationParams,
}

impl QualityScorer {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            params: GenerationParams::new(0.3, 100),
        }
    }

    pub async fn score(&self, answer: &str, query: &str) -> QualityRating {
        match self.client.generate(&score_prompt(answer, query), self.params).await {
            Ok(text) => QualityRating::success(text),
            Err(e) => {
                tracing::warn!(error = %e, "Scoring failed, using default rating");
                QualityRating::fallback()
            }
        }
    }
}
