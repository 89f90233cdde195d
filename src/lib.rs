//! # Weight Tracker
//!
//! A small full-stack Rust application for recording daily health metrics
//! (weight, waist, fasting window, energy, notes).
//!
//! All state lives in one JSON document, an array of entries, kept either
//! in a local file or in a remote blob store. The API exposes exactly two
//! operations on it: read the whole array and replace the whole array.
//!
//! ## Modules
//!
//! - [`storage`]: Entry document, storage backends and the repository
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use weight_tracker::storage::{Entry, EntryRepository, LocalFileStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = EntryRepository::new(LocalFileStore::new("./data", "weight-tracker.json"));
//!
//!     // Append today's entry and write the array back
//!     repo.append(&Entry::today().weight("70.4").fasting("16:8").energy("4")).await?;
//!
//!     let doc = repo.read().await;
//!     println!("{} entries recorded", doc.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    open_store, BackendKind, BlobStore, BlobStoreConfig, Document, DocumentStore, Entry,
    EntryRepository, LocalFileStore, MemoryStore, StorageError, StorageResult,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, BlobConfig, Config, ConfigError, LoggingConfig, StorageConfig};
