use std::sync::Arc;

use helpdesk_llm::{CompletionClient, GenerationParams};
use helpdesk_types::{RoutingResult, Status};

use crate::prompts::{check_structure, format_prompt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedAnswer {
    pub text: String,
    pub status: Status,
    /// Whether `text` follows the four-section layout
    pub well_formed: bool,
}

/// Rewrites research output into the structured Markdown answer
#[derive(Clone)]
pub struct Formatter {
    client: Arc<dyn CompletionClient>,
    params: GenerationParams,
    resummarize_params: GenerationParams,
}

impl Formatter {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            params: GenerationParams::new(0.3, 1024),
            resummarize_params: GenerationParams::new(0.9, 1024),
        }
    }

    /// Format `routing`. On failure the research text is returned unchanged.
    pub async fn format(&self, routing: &RoutingResult, variation_seed: Option<u64>) -> FormattedAnswer {
        let prompt = format_prompt(routing, variation_seed);
        let params = if routing.resummarize {
            self.resummarize_params
        } else {
            self.params
        };

        match self.client.generate(&prompt, params).await {
            Ok(text) => {
                let well_formed = check_structure(&text);
                if !well_formed {
                    tracing::warn!(
                        resummarize = routing.resummarize,
                        "Formatted answer does not follow the section layout"
                    );
                }
                FormattedAnswer {
                    text,
                    status: Status::Success,
                    well_formed,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Formatting failed, returning research text");
                FormattedAnswer {
                    well_formed: check_structure(&routing.response),
                    text: routing.response.clone(),
                    status: Status::Error,
                }
            }
        }
    }
}
