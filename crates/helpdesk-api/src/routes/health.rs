use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

use helpdesk_persist::{ChatStore, ConversationLog};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
}

/// Health check endpoint
///
/// Returns the health status of the API and its stores
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut services = HashMap::new();

    let chats = match state.persist.chats().list_chats().await {
        Ok(_) => "available",
        Err(_) => "unavailable",
    };
    services.insert("chat_store".to_string(), chats.to_string());

    let history = match state.persist.conversations().recent(1).await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };
    services.insert("conversation_log".to_string(), history.to_string());

    services.insert(
        "llm".to_string(),
        format!("{:?}/{}", state.config.llm.provider, state.config.llm.model).to_lowercase(),
    );

    let status = if services.values().any(|s| s == "unavailable" || s == "disconnected") {
        "degraded"
    } else {
        "healthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
    })
}
