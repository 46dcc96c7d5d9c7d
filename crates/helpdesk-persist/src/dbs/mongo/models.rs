use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use helpdesk_types::{Attachment, Chat, ChatMessage, FeedbackEntry};
use serde::{Deserialize, Serialize};

/// Chat document. Keeps the string id in `id` and lets MongoDB own `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoChat {
    pub id: String,
    pub title: String,
    #[serde(rename = "createdAt", with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub feedback: Vec<FeedbackEntry>,
}

impl From<Chat> for MongoChat {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id,
            title: chat.title,
            created_at: chat.created_at,
            messages: chat.messages,
            feedback: chat.feedback,
        }
    }
}

impl From<MongoChat> for Chat {
    fn from(doc: MongoChat) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            created_at: doc.created_at,
            messages: doc.messages,
            feedback: doc.feedback,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoAttachment {
    pub id: String,
    pub chat_id: String,
    pub filename: String,
    pub mime: String,
    pub size: i64,
    #[serde(default)]
    pub extracted_text: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl From<Attachment> for MongoAttachment {
    fn from(a: Attachment) -> Self {
        Self {
            id: a.id,
            chat_id: a.chat_id,
            filename: a.filename,
            mime: a.mime,
            size: a.size as i64,
            extracted_text: a.extracted_text,
            created_at: a.created_at,
        }
    }
}

impl From<MongoAttachment> for Attachment {
    fn from(doc: MongoAttachment) -> Self {
        Self {
            id: doc.id,
            chat_id: doc.chat_id,
            filename: doc.filename,
            mime: doc.mime,
            size: doc.size.max(0) as u64,
            extracted_text: doc.extracted_text,
            created_at: doc.created_at,
        }
    }
}
