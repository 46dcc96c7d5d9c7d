use std::sync::Arc;

use helpdesk_persist::{AttachmentService, ChatStore};

use crate::guidance::{append_guidance, build_feedback_guidance};

const MAX_ATTACHMENTS: usize = 3;
const MAX_SNIPPET_CHARS: usize = 600;

/// Query text enriched with chat feedback and attachment snippets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidedQuery {
    pub text: String,
    /// Dislike guidance that went into `text`, if any
    pub guidance: Option<String>,
}

/// Builds the guided query for a turn. Every lookup fails open: a store
/// error is logged and the query proceeds without that piece of context.
#[derive(Clone)]
pub struct ContextAssembler {
    chats: Arc<dyn ChatStore>,
    attachments: AttachmentService,
}

impl ContextAssembler {
    pub fn new(chats: Arc<dyn ChatStore>, attachments: AttachmentService) -> Self {
        Self { chats, attachments }
    }

    pub async fn assemble(
        &self,
        query: &str,
        chat_id: Option<&str>,
        attachment_ids: &[String],
    ) -> GuidedQuery {
        let Some(chat_id) = chat_id else {
            return GuidedQuery {
                text: query.to_string(),
                guidance: None,
            };
        };

        let guidance = self.feedback_guidance(Some(chat_id)).await;
        let mut text = match &guidance {
            Some(g) => append_guidance(query, g),
            None => query.to_string(),
        };

        if let Some(block) = self.attachment_context(chat_id, attachment_ids).await {
            text = format!("{block}\n\n{text}");
        }

        GuidedQuery { text, guidance }
    }

    /// Guidance lines from the chat's recent dislikes
    pub async fn feedback_guidance(&self, chat_id: Option<&str>) -> Option<String> {
        let chat_id = chat_id?;
        match self.chats.get_chat(chat_id).await {
            Ok(chat) => chat.as_ref().and_then(build_feedback_guidance),
            Err(e) => {
                tracing::warn!(chat_id = %chat_id, error = %e, "Skipping feedback guidance");
                None
            }
        }
    }

    async fn attachment_context(&self, chat_id: &str, ids: &[String]) -> Option<String> {
        let filter = (!ids.is_empty()).then_some(ids);
        let attachments = match self
            .attachments
            .find_by_chat(chat_id, filter, MAX_ATTACHMENTS)
            .await
        {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(chat_id = %chat_id, error = %e, "Skipping attachment context");
                return None;
            }
        };

        let snippets: Vec<String> = attachments
            .iter()
            .filter_map(|a| {
                let text = a.extracted_text.trim();
                if text.is_empty() {
                    return None;
                }
                let snippet: String = text.chars().take(MAX_SNIPPET_CHARS).collect();
                Some(format!("- {} ({}):\n{}", a.filename, a.mime, snippet))
            })
            .collect();

        if snippets.is_empty() {
            None
        } else {
            Some(format!("Attachment context:\n{}", snippets.join("\n\n")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_persist::PersistClient;
    use helpdesk_types::{FeedbackEntry, Rating};

    #[tokio::test]
    async fn test_plain_query_without_chat() {
        let persist = PersistClient::in_memory().await.unwrap();
        let assembler = ContextAssembler::new(persist.chats().clone(), persist.attachments().clone());

        let guided = assembler.assemble("reset password", None, &[]).await;
        assert_eq!(guided.text, "reset password");
        assert!(guided.guidance.is_none());
    }

    #[tokio::test]
    async fn test_attachments_then_guidance() {
        let persist = PersistClient::in_memory().await.unwrap();
        let chat = persist.chats().create_chat().await.unwrap();
        persist
            .chats()
            .append_feedback(&chat.id, FeedbackEntry::new(Rating::Dislike, "too vague", ""))
            .await
            .unwrap();
        persist
            .attachments()
            .store_upload(&chat.id, Some("error.log"), Some("text/plain"), b"E42 disk full".to_vec())
            .await
            .unwrap();
        persist
            .attachments()
            .store_upload(&chat.id, Some("photo.png"), None, vec![0x89, 0x50])
            .await
            .unwrap();

        let assembler = ContextAssembler::new(persist.chats().clone(), persist.attachments().clone());
        let guided = assembler.assemble("why E42?", Some(&chat.id), &[]).await;

        assert_eq!(
            guided.text,
            format!(
                "Attachment context:\n- error.log (text/plain):\nE42 disk full\n\nwhy E42?\n\n{}\n1. too vague",
                crate::guidance::GUIDANCE_HEADER
            )
        );
        assert_eq!(guided.guidance.as_deref(), Some("1. too vague"));
    }

    #[tokio::test]
    async fn test_unknown_chat_is_plain_query() {
        let persist = PersistClient::in_memory().await.unwrap();
        let assembler = ContextAssembler::new(persist.chats().clone(), persist.attachments().clone());

        let guided = assembler.assemble("hello", Some("missing"), &[]).await;
        assert_eq!(guided.text, "hello");
    }
}
