//! Weight Tracker API Server
//!
//! Run with: cargo run --bin weight-tracker-api
//!
//! # Configuration
//!
//! Settings come from `config.toml` (see `weight-tracker config`) and are
//! overridden by environment variables:
//! - `TRACKER_USE_LOCAL_STORAGE`: Local file (true) or remote blob store (false)
//! - `TRACKER_DATA_DIR`: Directory of the local document
//! - `BLOB_READ_WRITE_TOKEN`: Blob store token (required in remote mode)
//! - `TRACKER_BLOB_URL`: Blob store base URL
//! - `TRACKER_API_HOST` / `TRACKER_API_PORT`: Bind address (default: 0.0.0.0:3000)
//! - `TRACKER_UI_DIR`: Built UI to serve at `/`
//! - `RUST_LOG`: Log filter (overrides `TRACKER_LOG_LEVEL`)

use std::path::PathBuf;
use weight_tracker::api::{serve, AppState};
use weight_tracker::config::Config;
use weight_tracker::storage::open_store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("TRACKER_CONFIG").ok().map(PathBuf::from);
    let config = Config::resolve(config_path.as_deref())?;

    config.logging.init();

    tracing::info!("Starting Weight Tracker API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Storage mode: {}",
        if config.storage.local { "local file" } else { "remote blob" }
    );

    let store = open_store(&config.storage)?;
    let state = AppState::new(store, config.api.clone());

    tracing::info!("Starting server on {}", config.api.addr());
    serve(state, &config.api).await?;

    tracing::info!("Weight Tracker API server stopped");
    Ok(())
}
