//! Health Routes
//!
//! Health check endpoints for monitoring and container probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (storage backend reachable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// Outcome of probing the storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StorageHealth {
    Ok(usize),
    /// Backend reachable, document unusable (served as empty)
    Corrupt,
    Unreachable,
}

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 if the storage backend answers. A corrupt document still
/// counts as ready since reads degrade to an empty array.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match check_storage(&state).await {
        StorageHealth::Unreachable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store = state.repository.store();

    let (status, storage, entries) = match check_storage(&state).await {
        StorageHealth::Ok(count) => ("healthy", "ok", count),
        StorageHealth::Corrupt => ("degraded", "corrupt", 0),
        StorageHealth::Unreachable => ("unhealthy", "error", 0),
    };

    Json(HealthResponse {
        status: status.to_string(),
        storage: storage.to_string(),
        backend: store.kind().as_str().to_string(),
        location: store.describe(),
        entries,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn check_storage(state: &AppState) -> StorageHealth {
    match state.repository.try_read().await {
        Ok(doc) => StorageHealth::Ok(doc.len()),
        Err(e) if e.is_document_error() => StorageHealth::Corrupt,
        Err(e) => {
            tracing::warn!(error = %e, "Storage health check failed");
            StorageHealth::Unreachable
        }
    }
}
