pub mod chat;
pub mod session;
pub mod attachment;
pub mod routing;
pub mod history;

pub use chat::{
    is_placeholder_title, Chat, ChatMessage, ChatSummary, FeedbackEntry, MessageRole, Rating,
    DEFAULT_CHAT_TITLE, FALLBACK_CHAT_TITLE,
};
pub use session::ConversationTurn;
pub use attachment::{Attachment, AttachmentRef};
pub use routing::{QualityRating, RoutingResult, Status, DEFAULT_QUALITY_TEXT};
pub use history::{ConversationRecord, FeedbackRecord};
