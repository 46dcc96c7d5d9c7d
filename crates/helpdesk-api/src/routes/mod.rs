pub mod attachments;
pub mod chats;
pub mod feedback;
pub mod health;
pub mod history;
pub mod query;
