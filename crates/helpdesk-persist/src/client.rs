use std::sync::Arc;

use crate::attachments::AttachmentService;
use crate::error::Result;
use crate::json::{JsonChatStore, JsonFeedbackLog};
use crate::memory::MemoryBlobStore;
use crate::sqlite::{SqliteAttachmentStore, SqliteConversationLog, SqliteDatabase};
use crate::traits::{ChatStore, ConversationLog, FeedbackLog};

/// Handle to every store the helpdesk uses
#[derive(Clone)]
pub struct PersistClient {
    chats: Arc<dyn ChatStore>,
    conversations: Arc<dyn ConversationLog>,
    feedback: Arc<dyn FeedbackLog>,
    attachments: AttachmentService,
}

impl PersistClient {
    pub fn new(
        chats: Arc<dyn ChatStore>,
        conversations: Arc<dyn ConversationLog>,
        feedback: Arc<dyn FeedbackLog>,
        attachments: AttachmentService,
    ) -> Self {
        Self {
            chats,
            conversations,
            feedback,
            attachments,
        }
    }

    /// Everything in process memory; nothing touches disk
    pub async fn in_memory() -> Result<Self> {
        let db = SqliteDatabase::in_memory().await?;

        Ok(Self::new(
            Arc::new(JsonChatStore::in_memory()),
            Arc::new(SqliteConversationLog::new(db.clone())),
            Arc::new(JsonFeedbackLog::in_memory()),
            AttachmentService::new(
                Arc::new(SqliteAttachmentStore::new(db)),
                Arc::new(MemoryBlobStore::new()),
            ),
        ))
    }

    pub fn chats(&self) -> &Arc<dyn ChatStore> {
        &self.chats
    }

    pub fn conversations(&self) -> &Arc<dyn ConversationLog> {
        &self.conversations
    }

    pub fn feedback(&self) -> &Arc<dyn FeedbackLog> {
        &self.feedback
    }

    pub fn attachments(&self) -> &AttachmentService {
        &self.attachments
    }

    /// Delete a chat together with its attachments.
    ///
    /// Attachments are purged even when the chat record is already gone, so a
    /// retried delete cleans up leftovers. Returns whether the chat existed.
    pub async fn delete_chat_cascade(&self, chat_id: &str) -> Result<bool> {
        let deleted = self.chats.delete_chat(chat_id).await?;
        let purged = self.attachments.purge_chat(chat_id).await?;

        tracing::info!(chat_id = %chat_id, deleted, attachments = purged, "Deleted chat");
        Ok(deleted)
    }
}
