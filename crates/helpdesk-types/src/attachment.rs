use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for an uploaded file. The bytes live in a blob store under `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub chat_id: String,
    pub filename: String,
    pub mime: String,
    pub size: u64,
    /// Plain text pulled out of the file at upload time; empty when none
    #[serde(default)]
    pub extracted_text: String,
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    pub fn to_ref(&self) -> AttachmentRef {
        AttachmentRef {
            id: self.id.clone(),
            name: self.filename.clone(),
            mime: self.mime.clone(),
            size: self.size,
        }
    }
}

/// Upload response entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    pub id: String,
    pub name: String,
    pub mime: String,
    pub size: u64,
}
