//! HTTP API Client
//!
//! Functions for reading and replacing the entry array.

use gloo_net::http::Request;
use serde_json::Value;

use crate::state::global::records_from_json;

/// Default API base: same origin as the page
pub const DEFAULT_API_BASE: &str = "/api";

const API_URL_KEY: &str = "tracker_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let stored = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten());

    let url = stored.unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    pub error: String,
}

/// Load the stored records as they are.
///
/// A body that is not an array is an error; the caller falls back to an
/// empty list.
pub async fn fetch_entries() -> Result<Vec<Value>, String> {
    let response = Request::get(&format!("{}/data", get_api_base()))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    let body: Value = response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))?;

    match records_from_json(body) {
        Some(records) => Ok(records),
        None => Err("Data is not an array".to_string()),
    }
}

/// Replace the stored array with `records`
pub async fn save_entries(records: &[Value]) -> Result<(), String> {
    let response = Request::post(&format!("{}/data", get_api_base()))
        .json(&records)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        let error: ApiError = response.json().await.unwrap_or(ApiError {
            error: format!("Save failed with status {}", response.status()),
        });
        return Err(error.error);
    }

    Ok(())
}
