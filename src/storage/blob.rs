//! Remote Blob Store
//!
//! Keeps the document as a single public JSON object in an HTTP blob store.
//!
//! - `GET  <base_url>/<pathname>` reads the object (404 means no document yet)
//! - `PUT  <base_url>/<pathname>` overwrites it with a bearer-token request

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::error::{StorageError, StorageResult};
use super::types::Document;
use super::{BackendKind, DocumentStore};
use crate::config::BlobConfig;

/// Connection settings for the blob store
#[derive(Debug, Clone)]
pub struct BlobStoreConfig {
    /// Store base URL, e.g. "https://blob.vercel-storage.com"
    pub base_url: String,
    /// Object name of the document
    pub pathname: String,
    /// Read-write access token
    pub token: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl BlobStoreConfig {
    /// Check the remote settings from the storage config.
    ///
    /// Remote mode cannot run without both a location and a credential.
    pub fn from_config(config: &BlobConfig) -> StorageResult<Self> {
        let token = config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| StorageError::Config("blob store token is not set".to_string()))?;

        if config.base_url.trim().is_empty() {
            return Err(StorageError::Config("blob store base_url is not set".to_string()));
        }

        if config.pathname.trim().is_empty() {
            return Err(StorageError::Config("blob store pathname is not set".to_string()));
        }

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            pathname: config.pathname.trim_matches('/').to_string(),
            token: token.to_string(),
            request_timeout_ms: config.request_timeout_ms,
        })
    }
}

/// Blob store client
pub struct BlobStore {
    client: Client,
    config: BlobStoreConfig,
}

impl BlobStore {
    pub fn new(config: BlobStoreConfig) -> StorageResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &BlobStoreConfig {
        &self.config
    }

    /// URL of the document object
    pub fn object_url(&self) -> String {
        let encoded: Vec<String> = self
            .config
            .pathname
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();

        format!("{}/{}", self.config.base_url, encoded.join("/"))
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.token)
    }
}

fn map_send_error(e: reqwest::Error) -> StorageError {
    if e.is_timeout() {
        StorageError::Timeout
    } else if e.is_connect() {
        StorageError::Unavailable
    } else {
        StorageError::Http(e)
    }
}

async fn remote_error(response: reqwest::Response) -> StorageError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    StorageError::Remote { status, message }
}

#[async_trait]
impl DocumentStore for BlobStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Blob
    }

    fn describe(&self) -> String {
        self.object_url()
    }

    async fn load(&self) -> StorageResult<Option<Document>> {
        let response = self
            .client
            .get(self.object_url())
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .send()
            .await
            .map_err(map_send_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(remote_error(response).await);
        }

        let bytes = response.bytes().await.map_err(map_send_error)?;
        Document::from_slice(&bytes).map(Some)
    }

    async fn save(&self, doc: &Document) -> StorageResult<()> {
        let response = self
            .client
            .put(self.object_url())
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header("x-content-type", "application/json")
            .header("x-add-random-suffix", "0")
            .header("x-allow-overwrite", "1")
            .body(doc.to_bytes()?)
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(remote_error(response).await);
        }

        tracing::debug!(url = %self.object_url(), entries = doc.len(), "Document uploaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Entry;
    use axum::{
        body::Bytes,
        extract::{Path, State},
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::get,
        Router,
    };
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type Objects = Arc<Mutex<HashMap<String, Vec<u8>>>>;

    const TOKEN: &str = "test-token";

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == format!("Bearer {}", TOKEN))
            .unwrap_or(false)
    }

    async fn get_object(
        State(objects): State<Objects>,
        Path(path): Path<String>,
    ) -> Result<Vec<u8>, AxumStatus> {
        objects
            .lock()
            .unwrap()
            .get(&path)
            .cloned()
            .ok_or(AxumStatus::NOT_FOUND)
    }

    async fn put_object(
        State(objects): State<Objects>,
        Path(path): Path<String>,
        headers: HeaderMap,
        body: Bytes,
    ) -> AxumStatus {
        if !authorized(&headers) {
            return AxumStatus::UNAUTHORIZED;
        }
        objects.lock().unwrap().insert(path, body.to_vec());
        AxumStatus::OK
    }

    /// Emulates the object store on an ephemeral local port
    async fn spawn_object_store() -> (String, Objects) {
        let objects: Objects = Arc::new(Mutex::new(HashMap::new()));
        let app = Router::new()
            .route("/*path", get(get_object).put(put_object))
            .with_state(Arc::clone(&objects));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), objects)
    }

    fn store_for(base_url: &str, token: &str) -> BlobStore {
        BlobStore::new(BlobStoreConfig {
            base_url: base_url.to_string(),
            pathname: "weight-tracker.json".to_string(),
            token: token.to_string(),
            request_timeout_ms: 2000,
        })
        .unwrap()
    }

    #[test]
    fn test_config_validation() {
        let mut config = BlobConfig {
            token: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(BlobStoreConfig::from_config(&config).is_err());

        config.token = Some("abc".to_string());
        config.base_url = "https://blob.example.com/".to_string();
        let checked = BlobStoreConfig::from_config(&config).unwrap();
        assert_eq!(checked.base_url, "https://blob.example.com");
        assert_eq!(checked.token, "abc");

        config.base_url = String::new();
        assert!(BlobStoreConfig::from_config(&config).is_err());
    }

    #[test]
    fn test_object_url_encodes_segments() {
        let store = BlobStore::new(BlobStoreConfig {
            base_url: "https://blob.example.com".to_string(),
            pathname: "tracker/my data.json".to_string(),
            token: TOKEN.to_string(),
            request_timeout_ms: 1000,
        })
        .unwrap();

        assert_eq!(
            store.object_url(),
            "https://blob.example.com/tracker/my%20data.json"
        );
    }

    #[tokio::test]
    async fn test_missing_object_loads_none() {
        let (base_url, _objects) = spawn_object_store().await;
        let store = store_for(&base_url, TOKEN);

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let (base_url, objects) = spawn_object_store().await;
        let store = store_for(&base_url, TOKEN);

        let doc = Document::from_entries(&[Entry::new("2024-01-01").weight("70")]).unwrap();
        store.save(&doc).await.unwrap();

        assert!(objects.lock().unwrap().contains_key("weight-tracker.json"));
        assert_eq!(store.load().await.unwrap(), Some(doc));
    }

    #[tokio::test]
    async fn test_rejected_write() {
        let (base_url, objects) = spawn_object_store().await;
        let store = store_for(&base_url, "wrong-token");

        let err = store.save(&Document::empty()).await.unwrap_err();
        assert!(matches!(err, StorageError::Remote { status: 401, .. }));
        assert!(objects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_object() {
        let (base_url, objects) = spawn_object_store().await;
        objects
            .lock()
            .unwrap()
            .insert("weight-tracker.json".to_string(), b"\"scalar\"".to_vec());

        let store = store_for(&base_url, TOKEN);
        assert!(matches!(store.load().await, Err(StorageError::Corruption(_))));
    }

    #[tokio::test]
    async fn test_unreachable_store() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store = store_for(&format!("http://{}", addr), TOKEN);
        assert!(matches!(store.load().await, Err(StorageError::Unavailable)));
    }
}
