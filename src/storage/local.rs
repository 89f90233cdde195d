//! Local File Store
//!
//! Keeps the document as a single JSON file on disk.
//!
//! Writes go to a sibling temp file which is then renamed over the target,
//! so a concurrent reader sees either the old or the new document, never a
//! partial one.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::StorageResult;
use super::types::Document;
use super::{BackendKind, DocumentStore};

/// Document stored at `<data_dir>/<file_name>`
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    path: PathBuf,
}

impl LocalFileStore {
    pub fn new(data_dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(file_name),
        }
    }

    /// Full path of the document file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl DocumentStore for LocalFileStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> StorageResult<Option<Document>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Document::from_slice(&bytes).map(Some)
    }

    async fn save(&self, doc: &Document) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, doc.to_bytes()?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), entries = doc.len(), "Document written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Entry, StorageError};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path(), "entries.json");

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path().join("nested"), "entries.json");

        let doc = Document::from_entries(&[Entry::new("2024-01-01").weight("70")]).unwrap();
        store.save(&doc).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, doc);
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path(), "entries.json");

        let first = Document::from_entries(&[Entry::new("2024-01-01")]).unwrap();
        store.save(&first).await.unwrap();
        store.save(&Document::empty()).await.unwrap();

        assert!(store.load().await.unwrap().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path(), "entries.json");
        std::fs::write(store.path(), "{\"not\": \"an array\"}").unwrap();

        assert!(matches!(store.load().await, Err(StorageError::Corruption(_))));
    }

    #[tokio::test]
    async fn test_unwritable_location() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let store = LocalFileStore::new(&blocker, "entries.json");
        assert!(matches!(
            store.save(&Document::empty()).await,
            Err(StorageError::Io(_))
        ));
    }
}
