//! Weight Tracker HTTP API
//!
//! HTTP API layer, built with Axum.
//!
//! # Endpoints
//!
//! ## Data
//! - `GET /api/data` - Current entry array
//! - `POST /api/data` - Replace the entry array
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## UI
//! - `GET /*` - Built UI files, when `ui_dir` is configured
//!
//! # Example
//!
//! ```rust,ignore
//! use weight_tracker::api::{serve, AppState};
//! use weight_tracker::config::Config;
//! use weight_tracker::storage::open_store;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     let store = open_store(&config.storage)?;
//!
//!     let state = AppState::new(store, config.api.clone());
//!     serve(state, &config.api).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use crate::config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    let api_routes = Router::new()
        .route(
            "/data",
            get(routes::data::get_entries).post(routes::data::replace_entries),
        )
        .layer(DefaultBodyLimit::max(config.max_body_size));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    // Create shared state
    let shared_state = Arc::new(state);

    let mut router = Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes);

    if let Some(ui_dir) = &config.ui_dir {
        tracing::info!("Serving UI from {}", ui_dir);
        router = router.fallback_service(ServeDir::new(ui_dir).append_index_html_on_directories(true));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(cors_layer(&config.cors_origins))
        .with_state(shared_state)
}

/// CORS policy: any origin when none are configured, otherwise only the listed ones
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Weight Tracker API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Weight Tracker API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DocumentStore, LocalFileStore};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    fn create_test_app_with(store: LocalFileStore, config: ApiConfig) -> Router {
        let store: Arc<dyn DocumentStore> = Arc::new(store);
        build_router(AppState::new(store, config))
    }

    fn create_test_app() -> (Router, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = LocalFileStore::new(dir.path(), "weight-tracker.json");
        (create_test_app_with(store, ApiConfig::default()), dir)
    }

    async fn get(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_data(app: &Router, body: &str) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/data")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const EXAMPLE: &str =
        r#"[{"date":"2024-01-01","weight":"70","fasting":"16:8","energy":"3","notes":""}]"#;

    #[tokio::test]
    async fn test_health_live() {
        let (app, _dir) = create_test_app();

        let response = get(&app, "/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let (app, _dir) = create_test_app();

        let response = get(&app, "/health/ready").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _dir) = create_test_app();
        post_data(&app, EXAMPLE).await;

        let response = get(&app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["backend"], "local");
        assert_eq!(body["entries"], 1);
    }

    #[tokio::test]
    async fn test_get_without_document_returns_empty_array() {
        let (app, dir) = create_test_app();

        let response = get(&app, "/api/data").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));

        let response = get(&app, "/api/data").await;
        assert_eq!(body_json(response).await, json!([]));

        assert!(dir.path().join("weight-tracker.json").exists());
    }

    #[tokio::test]
    async fn test_post_then_get_round_trip() {
        let (app, _dir) = create_test_app();

        let response = post_data(&app, EXAMPLE).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"success": true}));

        let response = get(&app, "/api/data").await;
        assert_eq!(response.status(), StatusCode::OK);
        let expected: Value = serde_json::from_str(EXAMPLE).unwrap();
        assert_eq!(body_json(response).await, expected);
    }

    #[tokio::test]
    async fn test_post_non_array_is_rejected() {
        let (app, _dir) = create_test_app();
        post_data(&app, EXAMPLE).await;

        let response = post_data(&app, r#""not an array""#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Expected array data"})
        );

        let response = post_data(&app, r#"{"date":"2024-01-02"}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = get(&app, "/api/data").await;
        let expected: Value = serde_json::from_str(EXAMPLE).unwrap();
        assert_eq!(body_json(response).await, expected);
    }

    #[tokio::test]
    async fn test_post_invalid_json() {
        let (app, _dir) = create_test_app();

        let response = post_data(&app, "not json").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_post_without_content_type() {
        let (app, _dir) = create_test_app();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/data")
                    .body(Body::from("[]"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_storage_failure() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();
        let app = create_test_app_with(
            LocalFileStore::new(&blocker, "weight-tracker.json"),
            ApiConfig::default(),
        );

        let response = post_data(&app, EXAMPLE).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key(error::REQUEST_ID_HEADER));
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Failed to save data"));

        let response = get(&app, "/api/data").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));

        let response = get(&app, "/health/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_corrupt_document_reads_as_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("weight-tracker.json"), "{\"oops\": 1}").unwrap();
        let app = create_test_app_with(
            LocalFileStore::new(dir.path(), "weight-tracker.json"),
            ApiConfig::default(),
        );

        let response = get(&app, "/api/data").await;
        assert_eq!(body_json(response).await, json!([]));

        let response = get(&app, "/health").await;
        assert_eq!(body_json(response).await["storage"], "corrupt");
    }

    #[tokio::test]
    async fn test_body_limit() {
        let dir = tempdir().unwrap();
        let config = ApiConfig {
            max_body_size: 16,
            ..Default::default()
        };
        let app = create_test_app_with(LocalFileStore::new(dir.path(), "weight-tracker.json"), config);

        let response = post_data(&app, EXAMPLE).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_serves_ui_dir() {
        let data_dir = tempdir().unwrap();
        let ui_dir = tempdir().unwrap();
        std::fs::write(
            ui_dir.path().join("index.html"),
            "<title>Weight Tracker</title>",
        )
        .unwrap();

        let config = ApiConfig {
            ui_dir: Some(ui_dir.path().to_string_lossy().to_string()),
            ..Default::default()
        };
        let app = create_test_app_with(
            LocalFileStore::new(data_dir.path(), "weight-tracker.json"),
            config,
        );

        let response = get(&app, "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get(&app, "/api/data").await;
        assert_eq!(body_json(response).await, json!([]));
    }

    async fn preflight(app: &Router, origin: &str) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/data")
                    .header(header::ORIGIN, origin)
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_allows_only_listed_origins() {
        let dir = tempdir().unwrap();
        let config = ApiConfig {
            cors_origins: vec![
                "http://localhost:8080".to_string(),
                "bad\norigin".to_string(),
            ],
            ..Default::default()
        };
        let app = create_test_app_with(LocalFileStore::new(dir.path(), "weight-tracker.json"), config);

        let response = preflight(&app, "http://localhost:8080").await;
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:8080"
        );

        let response = preflight(&app, "http://evil.example").await;
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn test_cors_permissive_without_origins() {
        let (app, _dir) = create_test_app();

        let response = preflight(&app, "http://anywhere.example").await;
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
