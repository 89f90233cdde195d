//! Data Routes
//!
//! Read and replace the entry document.
//!
//! - GET /api/data - Current entry array (empty array on any failure)
//! - POST /api/data - Replace the whole array

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::api::dto::SuccessResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::Document;

/// GET /api/data
///
/// Always answers 200: a missing or unreadable document is served as `[]`.
pub async fn get_entries(State(state): State<Arc<AppState>>) -> Json<Document> {
    Json(state.repository.read().await)
}

/// POST /api/data
///
/// The body must be a JSON array; it replaces the stored document in one
/// write. The Content-Type header is not checked.
pub async fn replace_entries(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<SuccessResponse>> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    let doc = state.repository.replace(value).await?;
    tracing::debug!(entries = doc.len(), "Entries replaced via API");

    Ok(Json(SuccessResponse::ok()))
}
