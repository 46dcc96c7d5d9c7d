use std::sync::Arc;

use helpdesk_llm::{CompletionClient, GenerationParams};
use helpdesk_types::FALLBACK_CHAT_TITLE;

use crate::prompts::title_prompt;

const MAX_TITLE_CHARS: usize = 60;
const MAX_TITLE_WORDS: usize = 8;

/// Title from the first sentence of `text`: cut at the first `.`, `!`, `?`
/// or newline (whichever separator appears, checked in that order), first
/// eight words, at most 60 characters.
pub fn heuristic_title(text: &str) -> String {
    let mut t = text.trim();
    if t.is_empty() {
        return FALLBACK_CHAT_TITLE.to_string();
    }

    for sep in ['.', '!', '?', '\n'] {
        if let Some((head, _)) = t.split_once(sep) {
            t = head;
            break;
        }
    }

    let words = t.split_whitespace().take(MAX_TITLE_WORDS).collect::<Vec<_>>().join(" ");
    let title: String = words.chars().take(MAX_TITLE_CHARS).collect();

    if title.is_empty() {
        FALLBACK_CHAT_TITLE.to_string()
    } else {
        title
    }
}

/// Cheap completion that names a chat after its first exchange
#[derive(Clone)]
pub struct TitleGenerator {
    client: Arc<dyn CompletionClient>,
    params: GenerationParams,
}

impl TitleGenerator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            params: GenerationParams::new(0.2, 12),
        }
    }

    pub async fn generate(&self, user: &str, assistant: &str) -> String {
        match self.client.generate(&title_prompt(user, assistant), self.params).await {
            Ok(raw) => {
                let cleaned = raw.trim().trim_matches('"').trim();
                let title: String = cleaned.chars().take(MAX_TITLE_CHARS).collect();
                if title.is_empty() {
                    heuristic_title(user)
                } else {
                    title
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Title generation failed, using heuristic");
                heuristic_title(user)
            }
        }
    }
}
