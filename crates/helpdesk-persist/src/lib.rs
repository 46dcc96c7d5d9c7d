pub mod error;
pub mod traits;
pub mod extract;
pub mod attachments;
pub mod json;
pub mod sqlite;
pub mod fs;
pub mod memory;
pub mod dbs;
pub mod client;
pub mod builder;

pub use error::{PersistError, Result};
pub use traits::{AttachmentStore, Blob, BlobStore, ChatStore, ConversationLog, FeedbackLog};
pub use attachments::AttachmentService;
pub use json::{JsonChatStore, JsonFeedbackLog};
pub use sqlite::{SqliteAttachmentStore, SqliteConversationLog, SqliteDatabase};
pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;
pub use client::PersistClient;
pub use builder::PersistClientBuilder;

#[cfg(feature = "mongodb")]
pub use dbs::mongo::{MongoAttachmentStore, MongoChatStore};
