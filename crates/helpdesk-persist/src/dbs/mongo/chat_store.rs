use async_trait::async_trait;
use futures::TryStreamExt;
use helpdesk_types::{Chat, ChatMessage, ChatSummary, FeedbackEntry, DEFAULT_CHAT_TITLE, FALLBACK_CHAT_TITLE};
use mongodb::bson::{doc, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use super::models::MongoChat;
use crate::error::{PersistError, Result};
use crate::traits::ChatStore;

/// Chats collection. Every mutation is a single-document atomic update.
#[derive(Clone)]
pub struct MongoChatStore {
    collection: Collection<MongoChat>,
}

impl MongoChatStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("chats"),
        }
    }
}

/// Matches the titles `is_placeholder_title` accepts: blank, or a
/// placeholder in any case with surrounding whitespace.
fn placeholder_title_filter() -> Document {
    let pattern = format!(
        r"^\s*(?:{}|{})?\s*$",
        escape_regex(DEFAULT_CHAT_TITLE),
        escape_regex(FALLBACK_CHAT_TITLE)
    );
    doc! { "$regex": pattern, "$options": "i" }
}

fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if "\\^$.|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl ChatStore for MongoChatStore {
    async fn create_chat(&self) -> Result<Chat> {
        let chat = Chat::new();
        self.collection.insert_one(MongoChat::from(chat.clone())).await?;
        Ok(chat)
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>> {
        let found = self.collection.find_one(doc! { "id": chat_id }).await?;
        Ok(found.map(Chat::from))
    }

    async fn list_chats(&self) -> Result<Vec<ChatSummary>> {
        let chats: Vec<MongoChat> = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?;

        Ok(chats.into_iter().map(|c| Chat::from(c).summary()).collect())
    }

    async fn append_turn(&self, chat_id: &str, user: &str, assistant: &str) -> Result<Chat> {
        let messages = bson::to_bson(&vec![ChatMessage::user(user), ChatMessage::assistant(assistant)])?;
        let update = doc! { "$push": { "messages": { "$each": messages } } };

        self.collection
            .find_one_and_update(doc! { "id": chat_id }, update)
            .return_document(ReturnDocument::After)
            .await?
            .map(Chat::from)
            .ok_or_else(|| PersistError::ChatNotFound(chat_id.to_string()))
    }

    async fn set_title_if_placeholder(&self, chat_id: &str, title: &str) -> Result<bool> {
        let filter = doc! { "id": chat_id, "title": placeholder_title_filter() };
        let result = self
            .collection
            .update_one(filter, doc! { "$set": { "title": title } })
            .await?;
        Ok(result.modified_count > 0)
    }

    async fn append_feedback(&self, chat_id: &str, entry: FeedbackEntry) -> Result<bool> {
        let entry = bson::to_bson(&entry)?;
        let result = self
            .collection
            .update_one(doc! { "id": chat_id }, doc! { "$push": { "feedback": entry } })
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "id": chat_id }).await?;
        Ok(result.deleted_count > 0)
    }
}
