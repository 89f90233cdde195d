//! In-memory document store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::StorageResult;
use super::types::Document;
use super::{BackendKind, DocumentStore};

/// Holds the document in process memory; nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: RwLock<Option<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing document
    pub fn with_document(doc: Document) -> Self {
        Self {
            doc: RwLock::new(Some(doc)),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn load(&self) -> StorageResult<Option<Document>> {
        Ok(self.doc.read().await.clone())
    }

    async fn save(&self, doc: &Document) -> StorageResult<()> {
        *self.doc.write().await = Some(doc.clone());
        Ok(())
    }
}
