use std::sync::Arc;

use helpdesk_llm::{CompletionClient, GenerationParams};
use helpdesk_types::{ConversationTurn, RoutingResult};

use crate::prompts::research_prompt;

/// Answer returned to the user when the research call fails
pub const RESEARCH_FALLBACK: &str =
    "I'm having trouble processing that right now. Could you please rephrase your question?";

/// Open-ended conversational generation step
#[derive(Clone)]
pub struct Researcher {
    client: Arc<dyn CompletionClient>,
    params: GenerationParams,
}

impl Researcher {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            params: GenerationParams::new(0.7, 1024),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Research `guided_query` with the recent session turns. `query` is the
    /// user's own text and is what the result carries forward.
    pub async fn research(
        &self,
        query: &str,
        guided_query: &str,
        history: &[ConversationTurn],
    ) -> RoutingResult {
        let prompt = research_prompt(guided_query, history);

        match self.client.generate(&prompt, self.params).await {
            Ok(answer) => {
                tracing::info!(query_len = query.len(), answer_len = answer.len(), "Research completed");
                RoutingResult::success(query, answer)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Research failed, using fallback answer");
                RoutingResult::failed(query, RESEARCH_FALLBACK)
            }
        }
    }
}
