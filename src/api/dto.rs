//! Data Transfer Objects
//!
//! Response types for the API endpoints. The entry document itself is
//! served as-is (`storage::Document`), so only the envelopes live here.

use serde::{Deserialize, Serialize};

/// Response to a successful document replace
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded, unhealthy
    pub status: String,
    /// Storage status: ok, corrupt, error
    pub storage: String,
    /// Backend kind: local, blob, memory
    pub backend: String,
    /// Path or URL of the document
    pub location: String,
    /// Number of elements in the stored document
    pub entries: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
