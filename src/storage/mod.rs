//! Entry Document Storage
//!
//! This module persists the single JSON document holding every entry:
//!
//! - **types**: Core data structures (Entry, Document)
//! - **local**: Document kept as a file on local disk
//! - **blob**: Document kept as an object in a remote blob store
//! - **memory**: In-process document, for tests and throwaway runs
//! - **repository**: Best-effort read and whole-document replace on top of a backend
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Read Path:
//!   Repository::read → DocumentStore::load → parse → Document (or empty on failure)
//!
//! Write Path:
//!   Repository::replace → validate array → DocumentStore::save (whole document)
//! ```
//!
//! There is no locking or versioning: concurrent writers overwrite each
//! other and the last write wins.
//!
//! # Example
//!
//! ```rust,no_run
//! use weight_tracker::storage::{Entry, EntryRepository, LocalFileStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = EntryRepository::new(LocalFileStore::new("./data", "weight-tracker.json"));
//!
//!     let mut doc = repo.read().await;
//!     doc.push(&Entry::today().weight("70.2").fasting("16:8"))?;
//!     repo.save(&doc).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod blob;
pub mod error;
pub mod local;
pub mod memory;
pub mod repository;
pub mod types;

use async_trait::async_trait;
use std::sync::Arc;

pub use blob::{BlobStore, BlobStoreConfig};
pub use error::{StorageError, StorageResult};
pub use local::LocalFileStore;
pub use memory::MemoryStore;
pub use repository::EntryRepository;
pub use types::{Document, Entry, DATE_FORMAT};

use crate::config::StorageConfig;

/// Which kind of backend holds the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Blob,
    Memory,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => "local",
            BackendKind::Blob => "blob",
            BackendKind::Memory => "memory",
        }
    }
}

/// A place the whole document can be loaded from and saved to
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend kind
    fn kind(&self) -> BackendKind;

    /// Human-readable location of the document (path or URL)
    fn describe(&self) -> String;

    /// Load the stored document. `Ok(None)` means no document exists yet.
    async fn load(&self) -> StorageResult<Option<Document>>;

    /// Overwrite the stored document with `doc` in a single write
    async fn save(&self, doc: &Document) -> StorageResult<()>;
}

/// Build the backend selected by configuration
pub fn open_store(config: &StorageConfig) -> StorageResult<Arc<dyn DocumentStore>> {
    if config.local {
        let store = LocalFileStore::new(&config.data_dir, &config.file_name);
        tracing::info!("Using local document store at {}", store.describe());
        Ok(Arc::new(store))
    } else {
        let blob_config = BlobStoreConfig::from_config(&config.blob)?;
        let store = BlobStore::new(blob_config)?;
        tracing::info!("Using remote blob store at {}", store.describe());
        Ok(Arc::new(store))
    }
}
