//! SQLite-backed conversation log and attachment metadata.

mod pool;
mod conversation_log;
mod attachment_store;

pub use pool::SqliteDatabase;
pub use conversation_log::SqliteConversationLog;
pub use attachment_store::SqliteAttachmentStore;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{PersistError, Result};

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PersistError::Internal(format!("invalid datetime '{s}': {e}")))
}
