use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use helpdesk_core::{QueryRequest, RegenerateRequest};

use crate::{error::ApiResult, state::AppState};

fn default_session_id() -> String {
    "default".to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QueryBody {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_session_id")]
    pub session_id: String,
    #[serde(default)]
    pub chat_id: Option<String>,
    /// Attachment ids to restrict the attachment context to
    #[serde(default)]
    pub attachments: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegenerateBody {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_session_id")]
    pub session_id: String,
    #[serde(default)]
    pub chat_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueryResponse {
    pub summary: String,
    pub feedback: String,
    pub chat_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegenerateResponse {
    pub summary: String,
    pub feedback: String,
}

impl From<RegenerateBody> for RegenerateRequest {
    fn from(body: RegenerateBody) -> Self {
        Self {
            query: body.query,
            session_id: body.session_id,
            chat_id: body.chat_id.filter(|id| !id.is_empty()),
        }
    }
}

/// Answer a support query
#[utoipa::path(
    post,
    path = "/query",
    request_body = QueryBody,
    responses(
        (status = 200, description = "Formatted answer and quality rating", body = QueryResponse),
        (status = 400, description = "Empty query"),
        (status = 500, description = "Unexpected failure")
    ),
    tag = "chat"
)]
pub async fn handle_query(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QueryBody>, JsonRejection>,
) -> ApiResult<Json<QueryResponse>> {
    let Json(body) = payload?;
    let outcome = state
        .orchestrator
        .handle_query(QueryRequest {
            query: body.query,
            session_id: body.session_id,
            chat_id: body.chat_id.filter(|id| !id.is_empty()),
            attachment_ids: body.attachments.unwrap_or_default(),
        })
        .await?;

    Ok(Json(QueryResponse {
        summary: outcome.summary,
        feedback: outcome.feedback,
        chat_id: outcome.chat_id,
    }))
}

/// Re-format the last answer to the same query in a different style
#[utoipa::path(
    post,
    path = "/resummarize",
    request_body = RegenerateBody,
    responses(
        (status = 200, description = "Regenerated answer", body = RegenerateResponse),
        (status = 404, description = "No prior response for this query")
    ),
    tag = "chat"
)]
pub async fn resummarize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegenerateBody>, JsonRejection>,
) -> ApiResult<Json<RegenerateResponse>> {
    let Json(body) = payload?;
    let outcome = state.orchestrator.resummarize(body.into()).await?;

    Ok(Json(RegenerateResponse {
        summary: outcome.summary,
        feedback: outcome.feedback,
    }))
}

/// Research the query again and answer in a different style
#[utoipa::path(
    post,
    path = "/reresearch",
    request_body = RegenerateBody,
    responses(
        (status = 200, description = "Regenerated answer", body = RegenerateResponse),
        (status = 400, description = "Empty query")
    ),
    tag = "chat"
)]
pub async fn reresearch(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegenerateBody>, JsonRejection>,
) -> ApiResult<Json<RegenerateResponse>> {
    let Json(body) = payload?;
    let outcome = state.orchestrator.reresearch(body.into()).await?;

    Ok(Json(RegenerateResponse {
        summary: outcome.summary,
        feedback: outcome.feedback,
    }))
}
