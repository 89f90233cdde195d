//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ApiConfig;
use crate::storage::{DocumentStore, EntryRepository};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Whole-document access to the stored entries
    pub repository: EntryRepository,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: ApiConfig) -> Self {
        Self {
            repository: EntryRepository::from_arc(store),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
