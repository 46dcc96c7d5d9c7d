use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::traits::{Blob, BlobStore};

/// Process-local blob store, used when no blob directory is configured
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Blob>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, id: &str, blob: Blob) -> Result<()> {
        self.blobs.write().await.insert(id.to_string(), blob);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Blob>> {
        Ok(self.blobs.read().await.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.blobs.write().await.remove(id).is_some())
    }
}
