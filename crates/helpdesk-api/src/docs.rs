use utoipa::OpenApi;

use crate::routes::{attachments, chats, feedback, health, history, query};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        query::handle_query,
        query::resummarize,
        query::reresearch,
        feedback::submit_feedback,
        history::get_history,
        history::delete_history_item,
        history::clear_history,
        chats::list_chats,
        chats::get_chat,
        chats::new_chat,
        chats::delete_chat,
        attachments::upload_files,
        attachments::get_attachment,
    ),
    components(schemas(
        health::HealthResponse,
        query::QueryBody,
        query::RegenerateBody,
        query::QueryResponse,
        query::RegenerateResponse,
        feedback::FeedbackBody,
        feedback::FeedbackResponse,
        history::HistoryItem,
        history::HistoryResponse,
        history::DeletedResponse,
        history::ClearedResponse,
        chats::ChatSummaryResponse,
        chats::MessageResponse,
        chats::ChatResponse,
        attachments::AttachmentResponse,
        attachments::UploadResponse,
    )),
    tags(
        (name = "chat", description = "Query answering and regeneration"),
        (name = "feedback", description = "User feedback"),
        (name = "history", description = "Conversation log"),
        (name = "chats", description = "Chat records"),
        (name = "attachments", description = "File uploads"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
