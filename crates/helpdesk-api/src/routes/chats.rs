use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use helpdesk_persist::ChatStore;
use helpdesk_types::{Chat, ChatSummary, MessageRole};

use crate::{
    error::{ApiError, ApiResult},
    routes::history::DeletedResponse,
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatSummaryResponse {
    pub id: String,
    pub title: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<ChatSummary> for ChatSummaryResponse {
    fn from(summary: ChatSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            created_at: summary.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// "user" or "assistant"
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub id: String,
    pub title: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub messages: Vec<MessageResponse>,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id,
            title: chat.title,
            created_at: chat.created_at,
            messages: chat
                .messages
                .into_iter()
                .map(|m| MessageResponse {
                    role: match m.role {
                        MessageRole::User => "user",
                        MessageRole::Assistant => "assistant",
                    }
                    .to_string(),
                    content: m.content,
                })
                .collect(),
        }
    }
}

/// List chats, newest first
#[utoipa::path(
    get,
    path = "/api/chats",
    responses(
        (status = 200, description = "Chat summaries", body = Vec<ChatSummaryResponse>)
    ),
    tag = "chats"
)]
pub async fn list_chats(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ChatSummaryResponse>>> {
    let chats = state.persist.chats().list_chats().await?;
    Ok(Json(chats.into_iter().map(ChatSummaryResponse::from).collect()))
}

/// Get a chat with its messages
#[utoipa::path(
    get,
    path = "/api/chat/{chat_id}",
    params(
        ("chat_id" = String, Path, description = "Chat ID")
    ),
    responses(
        (status = 200, description = "Chat details", body = ChatResponse),
        (status = 404, description = "Chat not found")
    ),
    tag = "chats"
)]
pub async fn get_chat(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
) -> ApiResult<Json<ChatResponse>> {
    let chat = state
        .persist
        .chats()
        .get_chat(&chat_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(ChatResponse::from(chat)))
}

/// Create an empty chat
#[utoipa::path(
    post,
    path = "/api/chat/new",
    responses(
        (status = 200, description = "Chat created", body = ChatResponse)
    ),
    tag = "chats"
)]
pub async fn new_chat(State(state): State<Arc<AppState>>) -> ApiResult<Json<ChatResponse>> {
    let chat = state.persist.chats().create_chat().await?;
    Ok(Json(ChatResponse::from(chat)))
}

/// Delete a chat with its feedback and attachments
#[utoipa::path(
    delete,
    path = "/api/chat/{chat_id}",
    params(
        ("chat_id" = String, Path, description = "Chat ID")
    ),
    responses(
        (status = 200, description = "Chat deleted", body = DeletedResponse),
        (status = 404, description = "Chat not found", body = DeletedResponse)
    ),
    tag = "chats"
)]
pub async fn delete_chat(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
) -> ApiResult<Json<DeletedResponse>> {
    if state.persist.delete_chat_cascade(&chat_id).await? {
        Ok(Json(DeletedResponse { deleted: true }))
    } else {
        Err(ApiError::NotDeleted)
    }
}
