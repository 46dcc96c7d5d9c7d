use std::path::PathBuf;
use std::sync::Arc;

use crate::attachments::AttachmentService;
use crate::client::PersistClient;
use crate::error::Result;
use crate::fs::FsBlobStore;
use crate::json::{JsonChatStore, JsonFeedbackLog};
use crate::memory::MemoryBlobStore;
use crate::sqlite::{SqliteAttachmentStore, SqliteConversationLog, SqliteDatabase};
use crate::traits::{AttachmentStore, BlobStore, ChatStore};

pub struct PersistClientBuilder {
    chats_file: Option<PathBuf>,
    feedback_file: Option<PathBuf>,
    database_url: String,
    blob_dir: Option<PathBuf>,
    #[cfg(feature = "mongodb")]
    mongodb: Option<(String, String)>,
}

impl PersistClientBuilder {
    pub fn new() -> Self {
        Self {
            chats_file: None,
            feedback_file: None,
            database_url: "sqlite::memory:".to_string(),
            blob_dir: None,
            #[cfg(feature = "mongodb")]
            mongodb: None,
        }
    }

    /// JSON file for chat records. Unset means in memory.
    pub fn chats_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.chats_file = Some(path.into());
        self
    }

    pub fn feedback_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.feedback_file = Some(path.into());
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    /// Directory for uploaded bytes. Unset means in memory.
    pub fn blob_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.blob_dir = Some(dir.into());
        self
    }

    /// Keep chats and attachment metadata in MongoDB instead
    #[cfg(feature = "mongodb")]
    pub fn mongodb(mut self, uri: impl Into<String>, database: impl Into<String>) -> Self {
        self.mongodb = Some((uri.into(), database.into()));
        self
    }

    pub async fn build(self) -> Result<PersistClient> {
        let db = SqliteDatabase::connect(&self.database_url).await?;

        let chats: Arc<dyn ChatStore> = match &self.chats_file {
            Some(path) => Arc::new(JsonChatStore::open(path).await?),
            None => Arc::new(JsonChatStore::in_memory()),
        };
        let meta: Arc<dyn AttachmentStore> = Arc::new(SqliteAttachmentStore::new(db.clone()));

        #[cfg(feature = "mongodb")]
        let (chats, meta) = match &self.mongodb {
            Some((uri, database)) => {
                let mongo = crate::dbs::mongo::connect(uri, database).await?;
                tracing::info!(database = %database, "Using MongoDB for chats and attachments");
                (
                    Arc::new(crate::dbs::mongo::MongoChatStore::new(&mongo)) as Arc<dyn ChatStore>,
                    Arc::new(crate::dbs::mongo::MongoAttachmentStore::new(&mongo)) as Arc<dyn AttachmentStore>,
                )
            }
            None => (chats, meta),
        };

        let feedback = match &self.feedback_file {
            Some(path) => JsonFeedbackLog::open(path).await?,
            None => JsonFeedbackLog::in_memory(),
        };
        let blobs: Arc<dyn BlobStore> = match &self.blob_dir {
            Some(dir) => Arc::new(FsBlobStore::open(dir).await?),
            None => Arc::new(MemoryBlobStore::new()),
        };

        Ok(PersistClient::new(
            chats,
            Arc::new(SqliteConversationLog::new(db)),
            Arc::new(feedback),
            AttachmentService::new(meta, blobs),
        ))
    }
}

impl Default for PersistClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
