use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use helpdesk_persist::{ChatStore, FeedbackLog};
use helpdesk_types::{FeedbackEntry, FeedbackRecord, Rating};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct FeedbackBody {
    /// "like", "dislike" or empty
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub feedback: String,
    /// The answer being rated. Older clients send it as `response`.
    #[serde(default, alias = "response")]
    pub message: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub chat_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedbackResponse {
    pub status: String,
}

/// Record user feedback on an answer
#[utoipa::path(
    post,
    path = "/feedback",
    request_body = FeedbackBody,
    responses(
        (status = 200, description = "Feedback saved", body = FeedbackResponse),
        (status = 500, description = "Feedback log write failed")
    ),
    tag = "feedback"
)]
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FeedbackBody>, JsonRejection>,
) -> ApiResult<Json<FeedbackResponse>> {
    let Json(body) = payload.map_err(|e| {
        tracing::error!(error = %e.body_text(), "Error saving feedback");
        ApiError::FeedbackFailed
    })?;
    let rating = body.rating.as_deref().map(Rating::from).unwrap_or_default();
    let chat_id = body.chat_id.filter(|id| !id.is_empty());

    let record = FeedbackRecord::new(rating, &body.feedback, &body.query, &body.message)
        .with_chat_id(chat_id.clone());
    let logged = state.persist.feedback().append(record).await;

    if let Some(chat_id) = &chat_id {
        let entry = FeedbackEntry::new(rating, &body.feedback, &body.message);
        match state.persist.chats().append_feedback(chat_id, entry).await {
            Ok(true) => {}
            Ok(false) => tracing::debug!(chat_id = %chat_id, "Feedback for unknown chat not attached"),
            Err(e) => tracing::error!(chat_id = %chat_id, error = %e, "Failed to persist feedback to chat store"),
        }
    }

    match logged {
        Ok(()) => {
            tracing::info!(rating = rating.as_str(), "Feedback saved");
            Ok(Json(FeedbackResponse {
                status: "success".to_string(),
            }))
        }
        Err(e) => {
            tracing::error!(error = %e, "Error saving feedback");
            Err(ApiError::FeedbackFailed)
        }
    }
}
