use std::path::PathBuf;

use async_trait::async_trait;
use helpdesk_types::{is_placeholder_title, Chat, ChatSummary, FeedbackEntry};
use tokio::sync::Mutex;

use super::{load_document, write_document};
use crate::error::{PersistError, Result};
use crate::traits::ChatStore;

/// Chat records kept in a single JSON array file, newest chat first.
///
/// All operations go through one mutex, which serializes every
/// read-modify-write cycle on the document.
pub struct JsonChatStore {
    path: Option<PathBuf>,
    chats: Mutex<Vec<Chat>>,
}

impl JsonChatStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let chats: Vec<Chat> = load_document(&path).await?;
        tracing::debug!(path = %path.display(), chats = chats.len(), "Loaded chat store");

        Ok(Self {
            path: Some(path),
            chats: Mutex::new(chats),
        })
    }

    /// Store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            path: None,
            chats: Mutex::new(Vec::new()),
        }
    }

    /// Apply `f` to a copy of the document. When it returns `Some`, the copy
    /// is flushed and then becomes the live state.
    async fn mutate<T, F>(&self, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut Vec<Chat>) -> Option<T>,
    {
        let mut guard = self.chats.lock().await;
        let mut next = guard.clone();

        let Some(out) = f(&mut next) else {
            return Ok(None);
        };

        if let Some(path) = &self.path {
            write_document(path, &next).await?;
        }
        *guard = next;
        Ok(Some(out))
    }
}

#[async_trait]
impl ChatStore for JsonChatStore {
    async fn create_chat(&self) -> Result<Chat> {
        let chat = Chat::new();
        let created = chat.clone();
        self.mutate(move |chats| {
            chats.insert(0, chat);
            Some(())
        })
        .await?;

        tracing::info!(chat_id = %created.id, "Created chat");
        Ok(created)
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>> {
        let chats = self.chats.lock().await;
        Ok(chats.iter().find(|c| c.id == chat_id).cloned())
    }

    async fn list_chats(&self) -> Result<Vec<ChatSummary>> {
        let chats = self.chats.lock().await;
        let mut summaries: Vec<ChatSummary> = chats.iter().map(Chat::summary).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    async fn append_turn(&self, chat_id: &str, user: &str, assistant: &str) -> Result<Chat> {
        self.mutate(|chats| {
            let chat = chats.iter_mut().find(|c| c.id == chat_id)?;
            chat.push_turn(user, assistant);
            Some(chat.clone())
        })
        .await?
        .ok_or_else(|| PersistError::ChatNotFound(chat_id.to_string()))
    }

    async fn set_title_if_placeholder(&self, chat_id: &str, title: &str) -> Result<bool> {
        let changed = self
            .mutate(|chats| {
                let chat = chats.iter_mut().find(|c| c.id == chat_id)?;
                if !is_placeholder_title(&chat.title) {
                    return None;
                }
                chat.title = title.to_string();
                Some(())
            })
            .await?;

        Ok(changed.is_some())
    }

    async fn append_feedback(&self, chat_id: &str, entry: FeedbackEntry) -> Result<bool> {
        let appended = self
            .mutate(|chats| {
                let chat = chats.iter_mut().find(|c| c.id == chat_id)?;
                chat.feedback.push(entry);
                Some(())
            })
            .await?;

        Ok(appended.is_some())
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<bool> {
        let removed = self
            .mutate(|chats| {
                let idx = chats.iter().position(|c| c.id == chat_id)?;
                chats.remove(idx);
                Some(())
            })
            .await?;

        Ok(removed.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_types::Rating;

    #[tokio::test]
    async fn test_append_turn_on_missing_chat() {
        let store = JsonChatStore::in_memory();

        let err = store.append_turn("nope", "q", "a").await.unwrap_err();
        assert!(matches!(err, PersistError::ChatNotFound(_)));
    }

    #[tokio::test]
    async fn test_title_only_replaced_while_placeholder() {
        let store = JsonChatStore::in_memory();
        let chat = store.create_chat().await.unwrap();

        assert!(store.set_title_if_placeholder(&chat.id, "Printer setup").await.unwrap());
        assert!(!store.set_title_if_placeholder(&chat.id, "Something else").await.unwrap());

        let chat = store.get_chat(&chat.id).await.unwrap().unwrap();
        assert_eq!(chat.title, "Printer setup");
    }

    #[tokio::test]
    async fn test_feedback_and_delete() {
        let store = JsonChatStore::in_memory();
        let chat = store.create_chat().await.unwrap();

        let entry = FeedbackEntry::new(Rating::Dislike, "too long", "answer");
        assert!(store.append_feedback(&chat.id, entry.clone()).await.unwrap());
        assert!(!store.append_feedback("missing", entry).await.unwrap());

        assert!(store.delete_chat(&chat.id).await.unwrap());
        assert!(!store.delete_chat(&chat.id).await.unwrap());
        assert!(store.get_chat(&chat.id).await.unwrap().is_none());
    }
}
