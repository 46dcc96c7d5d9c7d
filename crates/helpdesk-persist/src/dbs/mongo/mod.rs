//! MongoDB-backed chat and attachment metadata stores.

mod models;
mod chat_store;
mod attachment_store;

pub use chat_store::MongoChatStore;
pub use attachment_store::MongoAttachmentStore;

use mongodb::{Client, Database};

use crate::error::{PersistError, Result};

pub async fn connect(uri: &str, db_name: &str) -> Result<Database> {
    let client = Client::with_uri_str(uri)
        .await
        .map_err(|e| PersistError::Connection(e.to_string()))?;
    Ok(client.database(db_name))
}
