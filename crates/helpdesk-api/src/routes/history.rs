use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use helpdesk_persist::ConversationLog;
use helpdesk_types::ConversationRecord;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

const HISTORY_LIMIT: usize = 20;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryItem {
    pub id: i64,
    pub user_query: String,
    pub bot_response: String,
    pub timestamp: DateTime<Utc>,
}

impl From<ConversationRecord> for HistoryItem {
    fn from(record: ConversationRecord) -> Self {
        Self {
            id: record.id,
            user_query: record.user_query,
            bot_response: record.bot_response,
            timestamp: record.timestamp,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub history: Vec<HistoryItem>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClearedResponse {
    pub cleared: bool,
    pub count: u64,
}

/// Most recent logged conversations, oldest first
#[utoipa::path(
    get,
    path = "/api/history",
    responses(
        (status = 200, description = "Recent conversations", body = HistoryResponse)
    ),
    tag = "history"
)]
pub async fn get_history(State(state): State<Arc<AppState>>) -> ApiResult<Json<HistoryResponse>> {
    let mut records = state.persist.conversations().recent(HISTORY_LIMIT).await?;
    records.reverse();

    Ok(Json(HistoryResponse {
        history: records.into_iter().map(HistoryItem::from).collect(),
    }))
}

/// Delete one logged conversation
#[utoipa::path(
    delete,
    path = "/api/history/{id}",
    params(
        ("id" = i64, Path, description = "Conversation log id")
    ),
    responses(
        (status = 200, description = "Deleted", body = DeletedResponse),
        (status = 404, description = "No such entry", body = DeletedResponse)
    ),
    tag = "history"
)]
pub async fn delete_history_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedResponse>> {
    if state.persist.conversations().delete(id).await? {
        Ok(Json(DeletedResponse { deleted: true }))
    } else {
        Err(ApiError::NotDeleted)
    }
}

/// Delete every logged conversation
#[utoipa::path(
    delete,
    path = "/api/history",
    responses(
        (status = 200, description = "Log cleared", body = ClearedResponse)
    ),
    tag = "history"
)]
pub async fn clear_history(State(state): State<Arc<AppState>>) -> ApiResult<Json<ClearedResponse>> {
    let count = state.persist.conversations().clear().await?;
    tracing::info!(count, "Cleared conversation history");

    Ok(Json(ClearedResponse {
        cleared: true,
        count,
    }))
}
