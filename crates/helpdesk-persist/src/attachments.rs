use std::sync::Arc;

use chrono::Utc;
use helpdesk_types::Attachment;

use crate::error::Result;
use crate::extract::{extract_text, safe_mime};
use crate::traits::{AttachmentStore, Blob, BlobStore};

const DEFAULT_FILENAME: &str = "upload.bin";

/// Attachment metadata and bytes handled as one unit
#[derive(Clone)]
pub struct AttachmentService {
    meta: Arc<dyn AttachmentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl AttachmentService {
    pub fn new(meta: Arc<dyn AttachmentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { meta, blobs }
    }

    /// Store one uploaded file under a fresh id. Bytes are written before
    /// metadata, so a listed attachment always has content.
    pub async fn store_upload(
        &self,
        chat_id: &str,
        filename: Option<&str>,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Attachment> {
        let filename = filename
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        let mime = safe_mime(&filename, content_type);
        let extracted_text = extract_text(&filename, &mime, &bytes);

        let attachment = Attachment {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.to_string(),
            filename: filename.clone(),
            mime: mime.clone(),
            size: bytes.len() as u64,
            extracted_text,
            created_at: Utc::now(),
        };

        self.blobs
            .put(
                &attachment.id,
                Blob {
                    filename,
                    content_type: mime,
                    bytes,
                },
            )
            .await?;
        self.meta.upsert(attachment.clone()).await?;

        tracing::info!(
            attachment_id = %attachment.id,
            chat_id = %chat_id,
            mime = %attachment.mime,
            size = attachment.size,
            "Stored attachment"
        );
        Ok(attachment)
    }

    /// Bytes plus stored filename and content type
    pub async fn open(&self, id: &str) -> Result<Option<Blob>> {
        if self.meta.get(id).await?.is_none() {
            return Ok(None);
        }
        self.blobs.get(id).await
    }

    pub async fn find_by_chat(
        &self,
        chat_id: &str,
        ids: Option<&[String]>,
        limit: usize,
    ) -> Result<Vec<Attachment>> {
        self.meta.find_by_chat(chat_id, ids, limit).await
    }

    /// Delete all attachments of a chat. Blob removal failures are logged and
    /// skipped. Returns how many metadata rows were removed.
    pub async fn purge_chat(&self, chat_id: &str) -> Result<usize> {
        let ids = self.meta.delete_by_chat(chat_id).await?;

        for id in &ids {
            if let Err(e) = self.blobs.delete(id).await {
                tracing::warn!(attachment_id = %id, error = %e, "Failed to delete attachment blob");
            }
        }

        Ok(ids.len())
    }
}
