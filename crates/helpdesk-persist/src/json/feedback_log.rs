use std::path::PathBuf;

use async_trait::async_trait;
use helpdesk_types::FeedbackRecord;
use tokio::sync::Mutex;

use super::{load_document, write_document};
use crate::error::Result;
use crate::traits::FeedbackLog;

/// Append-only feedback log stored as one JSON array
pub struct JsonFeedbackLog {
    path: Option<PathBuf>,
    records: Mutex<Vec<FeedbackRecord>>,
}

impl JsonFeedbackLog {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records: Vec<FeedbackRecord> = load_document(&path).await?;

        Ok(Self {
            path: Some(path),
            records: Mutex::new(records),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl FeedbackLog for JsonFeedbackLog {
    async fn append(&self, record: FeedbackRecord) -> Result<()> {
        let mut records = self.records.lock().await;
        let mut next = records.clone();
        next.push(record);

        if let Some(path) = &self.path {
            write_document(path, &next).await?;
        }
        *records = next;
        Ok(())
    }

    async fn all(&self) -> Result<Vec<FeedbackRecord>> {
        Ok(self.records.lock().await.clone())
    }
}
