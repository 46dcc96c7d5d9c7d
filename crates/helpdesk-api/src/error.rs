use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use helpdesk_core::PipelineError;
use serde_json::json;
use thiserror::Error;

/// Apology returned when a turn fails unexpectedly
pub const TURN_FAILURE_MESSAGE: &str = "I encountered an error. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Empty query")]
    EmptyQuery,

    #[error("No prior response found to resummarize.")]
    NoPriorResponse,

    #[error("Turn failed: {0}")]
    TurnFailed(String),

    #[error("Not found")]
    NotFound,

    /// Delete of something that does not exist
    #[error("Nothing to delete")]
    NotDeleted,

    #[error("Feedback could not be saved")]
    FeedbackFailed,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Persistence error: {0}")]
    Persist(#[from] helpdesk_persist::PersistError),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::EmptyQuery => ApiError::EmptyQuery,
            PipelineError::NoPriorResponse => ApiError::NoPriorResponse,
            PipelineError::Internal(e) => ApiError::TurnFailed(format!("{e:#}")),
        }
    }
}

/// Unreadable turn bodies answer like any other failed turn
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::TurnFailed(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::EmptyQuery => (
                StatusCode::BAD_REQUEST,
                json!({ "summary": "", "feedback": "Empty query" }),
            ),
            ApiError::NoPriorResponse => (
                StatusCode::NOT_FOUND,
                json!({ "summary": "", "feedback": self.to_string() }),
            ),
            ApiError::TurnFailed(ref reason) => {
                tracing::error!("Error handling turn: {}", reason);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "summary": TURN_FAILURE_MESSAGE, "feedback": "" }),
                )
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, json!({ "detail": "Not found" })),
            ApiError::NotDeleted => (StatusCode::NOT_FOUND, json!({ "deleted": false })),
            ApiError::FeedbackFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "status": "error" }),
            ),
            ApiError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, json!({ "detail": msg }))
            }
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
