use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{PersistError, Result};
use crate::traits::{Blob, BlobStore};

/// Blobs on local disk: `{dir}/{id}.bin` plus a `{id}.json` metadata sidecar
pub struct FsBlobStore {
    dir: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct BlobMeta {
    filename: String,
    content_type: String,
}

impl FsBlobStore {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn paths(&self, id: &str) -> Result<(PathBuf, PathBuf)> {
        // ids become file names
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(PersistError::InvalidId(id.to_string()));
        }
        Ok((
            self.dir.join(format!("{id}.bin")),
            self.dir.join(format!("{id}.json")),
        ))
    }
}

async fn remove_if_exists(path: &Path) -> Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, id: &str, blob: Blob) -> Result<()> {
        let (data_path, meta_path) = self.paths(id)?;
        let meta = BlobMeta {
            filename: blob.filename,
            content_type: blob.content_type,
        };

        tokio::fs::write(&data_path, &blob.bytes).await?;
        tokio::fs::write(&meta_path, serde_json::to_vec(&meta)?).await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Blob>> {
        let (data_path, meta_path) = self.paths(id)?;

        let bytes = match tokio::fs::read(&data_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let meta: BlobMeta = serde_json::from_slice(&tokio::fs::read(&meta_path).await?)?;

        Ok(Some(Blob {
            filename: meta.filename,
            content_type: meta.content_type,
            bytes,
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let (data_path, meta_path) = self.paths(id)?;
        let removed = remove_if_exists(&data_path).await?;
        remove_if_exists(&meta_path).await?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();

        let blob = Blob {
            filename: "notes.txt".to_string(),
            content_type: "text/plain".to_string(),
            bytes: b"hello".to_vec(),
        };
        store.put("abc-123", blob.clone()).await.unwrap();

        assert_eq!(store.get("abc-123").await.unwrap(), Some(blob));
        assert!(store.delete("abc-123").await.unwrap());
        assert!(store.get("abc-123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();

        let err = store.get("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, PersistError::InvalidId(_)));
    }
}
