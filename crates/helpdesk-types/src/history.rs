use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::Rating;

/// Row of the relational conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: i64,
    pub user_query: String,
    pub bot_response: String,
    pub timestamp: DateTime<Utc>,
}

/// Entry of the append-only feedback log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub rating: Rating,
    pub feedback: String,
    pub query: String,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

impl FeedbackRecord {
    pub fn new(
        rating: Rating,
        feedback: impl Into<String>,
        query: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            rating,
            feedback: feedback.into(),
            query: query.into(),
            response: response.into(),
            chat_id: None,
        }
    }

    pub fn with_chat_id(mut self, chat_id: Option<String>) -> Self {
        self.chat_id = chat_id;
        self
    }
}
