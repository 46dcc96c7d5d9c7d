use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title given to chats before one is derived from their content
pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

/// Title used when nothing better can be derived
pub const FALLBACK_CHAT_TITLE: &str = "Untitled";

/// True when `title` still holds a placeholder and may be replaced.
pub fn is_placeholder_title(title: &str) -> bool {
    let title = title.trim();
    title.is_empty()
        || title.eq_ignore_ascii_case(DEFAULT_CHAT_TITLE)
        || title.eq_ignore_ascii_case(FALLBACK_CHAT_TITLE)
}

/// A persisted, titled conversation thread.
///
/// Serialized with the field names the chat JSON store has always used
/// (`createdAt`), so existing `chats_data.json` files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub feedback: Vec<FeedbackEntry>,
}

fn default_title() -> String {
    FALLBACK_CHAT_TITLE.to_string()
}

impl Chat {
    /// New empty chat with a fresh id and the placeholder title
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_CHAT_TITLE.to_string(),
            created_at: Utc::now(),
            messages: Vec::new(),
            feedback: Vec::new(),
        }
    }

    pub fn has_placeholder_title(&self) -> bool {
        is_placeholder_title(&self.title)
    }

    /// Append one user/assistant exchange
    pub fn push_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.messages.push(ChatMessage::user(user));
        self.messages.push(ChatMessage::assistant(assistant));
    }

    /// Feedback entries, most recent first
    pub fn feedback_newest_first(&self) -> impl Iterator<Item = &FeedbackEntry> {
        self.feedback.iter().rev()
    }

    pub fn summary(&self) -> ChatSummary {
        ChatSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
        }
    }
}

impl Default for Chat {
    fn default() -> Self {
        Self::new()
    }
}

/// Sidebar listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Thumbs rating attached to a feedback entry. Anything unrecognised is `Unrated`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Like,
    Dislike,
    #[default]
    #[serde(rename = "", other)]
    Unrated,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Like => "like",
            Rating::Dislike => "dislike",
            Rating::Unrated => "",
        }
    }
}

impl From<&str> for Rating {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "like" => Rating::Like,
            "dislike" => Rating::Dislike,
            _ => Rating::Unrated,
        }
    }
}

/// User feedback on one assistant response, stored inside its chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    #[serde(default)]
    pub rating: Rating,
    #[serde(default)]
    pub feedback: String,
    /// The response text the feedback refers to
    #[serde(default)]
    pub message: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FeedbackEntry {
    pub fn new(rating: Rating, feedback: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rating,
            feedback: feedback.into(),
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_dislike(&self) -> bool {
        self.rating == Rating::Dislike
    }
}
