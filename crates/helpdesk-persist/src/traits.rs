use async_trait::async_trait;
use helpdesk_types::{Attachment, Chat, ChatSummary, ConversationRecord, FeedbackEntry, FeedbackRecord};

use crate::error::Result;

/// Per-chat record store.
///
/// Every mutating operation is atomic with respect to a single chat, so
/// concurrent requests on the same chat never lose each other's writes.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Insert a new empty chat with the placeholder title
    async fn create_chat(&self) -> Result<Chat>;

    async fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>>;

    /// Summaries, most recently created first
    async fn list_chats(&self) -> Result<Vec<ChatSummary>>;

    /// Append a user message and an assistant message as one write.
    ///
    /// Returns the updated chat, or [`PersistError::ChatNotFound`](crate::PersistError::ChatNotFound).
    async fn append_turn(&self, chat_id: &str, user: &str, assistant: &str) -> Result<Chat>;

    /// Replace the title only while it is still a placeholder. Returns whether it changed.
    async fn set_title_if_placeholder(&self, chat_id: &str, title: &str) -> Result<bool>;

    /// Returns false when the chat does not exist
    async fn append_feedback(&self, chat_id: &str, entry: FeedbackEntry) -> Result<bool>;

    /// Removes the chat with its messages and feedback. Returns false when absent.
    async fn delete_chat(&self, chat_id: &str) -> Result<bool>;
}

/// Relational log of every answered query
#[async_trait]
pub trait ConversationLog: Send + Sync {
    async fn append(&self, user_query: &str, bot_response: &str) -> Result<ConversationRecord>;

    /// Most recent first
    async fn recent(&self, limit: usize) -> Result<Vec<ConversationRecord>>;

    async fn delete(&self, id: i64) -> Result<bool>;

    /// Returns the number of removed rows
    async fn clear(&self) -> Result<u64>;
}

/// Append-only log of all feedback submissions
#[async_trait]
pub trait FeedbackLog: Send + Sync {
    async fn append(&self, record: FeedbackRecord) -> Result<()>;

    async fn all(&self) -> Result<Vec<FeedbackRecord>>;
}

/// Attachment metadata store
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn upsert(&self, attachment: Attachment) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<Attachment>>;

    /// Attachments of a chat, newest first, optionally restricted to `ids`
    async fn find_by_chat(
        &self,
        chat_id: &str,
        ids: Option<&[String]>,
        limit: usize,
    ) -> Result<Vec<Attachment>>;

    /// Removes every attachment row of the chat and returns the removed ids
    async fn delete_by_chat(&self, chat_id: &str) -> Result<Vec<String>>;
}

/// Raw uploaded bytes plus what is needed to serve them back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Blob store keyed by generated attachment id
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, id: &str, blob: Blob) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<Blob>>;

    async fn delete(&self, id: &str) -> Result<bool>;
}
