//! Entry Repository
//!
//! Read and replace operations over whichever [`DocumentStore`] holds the
//! document. Reads are best-effort and never fail; replacing validates the
//! array shape before anything is written.

use serde_json::Value;
use std::sync::Arc;

use super::error::StorageResult;
use super::types::{Document, Entry};
use super::DocumentStore;

/// Whole-document access to the stored entries
#[derive(Clone)]
pub struct EntryRepository {
    store: Arc<dyn DocumentStore>,
}

impl EntryRepository {
    pub fn new(store: impl DocumentStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_arc(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The backend holding the document
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Current document, or an empty one.
    ///
    /// A missing document is initialized to `[]` in the backend. Any load or
    /// parse failure is logged and degrades to an empty document.
    pub async fn read(&self) -> Document {
        match self.store.load().await {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                tracing::info!(store = %self.store.describe(), "No document found, initializing empty array");
                if let Err(e) = self.store.save(&Document::empty()).await {
                    tracing::warn!(error = %e, "Failed to initialize empty document");
                }
                Document::empty()
            }
            Err(e) => {
                tracing::warn!(
                    store = %self.store.describe(),
                    error = %e,
                    "Failed to read document, returning empty array"
                );
                Document::empty()
            }
        }
    }

    /// Like [`read`](Self::read) but surfaces backend failures.
    ///
    /// A missing document counts as empty.
    pub async fn try_read(&self) -> StorageResult<Document> {
        Ok(self.store.load().await?.unwrap_or_default())
    }

    /// Replace the stored document with a caller-supplied JSON value.
    ///
    /// Non-array values are rejected with [`StorageError::NotAnArray`]
    /// before the backend is touched.
    ///
    /// [`StorageError::NotAnArray`]: super::StorageError::NotAnArray
    pub async fn replace(&self, value: Value) -> StorageResult<Document> {
        let doc = Document::from_value(value)?;
        self.save(&doc).await?;
        Ok(doc)
    }

    /// Overwrite the stored document
    pub async fn save(&self, doc: &Document) -> StorageResult<()> {
        self.store.save(doc).await?;
        tracing::info!(entries = doc.len(), "Document replaced");
        Ok(())
    }

    /// Append one entry and write the whole array back.
    ///
    /// Same read-modify-write cycle the form performs, so the last writer wins.
    /// A document that cannot be loaded is left untouched and the load error
    /// is returned.
    pub async fn append(&self, entry: &Entry) -> StorageResult<Document> {
        let mut doc = self.try_read().await?;
        doc.push(entry)?;
        self.save(&doc).await?;
        Ok(doc)
    }
}
