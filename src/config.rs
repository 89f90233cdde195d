//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Document storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Keep the document on local disk (`true`) or in the remote blob store
    #[serde(default = "default_local")]
    pub local: bool,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_file_name")]
    pub file_name: String,

    #[serde(default)]
    pub blob: BlobConfig,
}

fn default_local() -> bool {
    true
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("weight-tracker").to_string_lossy().to_string())
        .unwrap_or_else(|| "./data".to_string())
}

fn default_file_name() -> String {
    "weight-tracker.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local: default_local(),
            data_dir: default_data_dir(),
            file_name: default_file_name(),
            blob: BlobConfig::default(),
        }
    }
}

/// Remote blob store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BlobConfig {
    #[serde(default = "default_blob_url")]
    pub base_url: String,

    #[serde(default = "default_file_name")]
    pub pathname: String,

    /// Read-write token; usually supplied through `BLOB_READ_WRITE_TOKEN`
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_blob_timeout")]
    pub request_timeout_ms: u64,
}

fn default_blob_url() -> String {
    "https://blob.vercel-storage.com".to_string()
}

fn default_blob_timeout() -> u64 {
    10_000
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            base_url: default_blob_url(),
            pathname: default_file_name(),
            token: None,
            request_timeout_ms: default_blob_timeout(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Directory holding the built UI, served at `/` when set
    #[serde(default)]
    pub ui_dir: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_body_size() -> usize {
    2 * 1024 * 1024 // 2 MB
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
            max_body_size: default_max_body_size(),
            ui_dir: None,
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber.
    ///
    /// Events go to stderr so stdout stays free for command output.
    /// `RUST_LOG` takes precedence over the configured level.
    pub fn init(&self) {
        if tracing::subscriber::set_global_default(self.subscriber(std::io::stderr)).is_err() {
            tracing::debug!("Tracing subscriber already installed");
        }
    }

    /// Subscriber formatting events as configured and writing them to `writer`
    pub fn subscriber<W>(&self, writer: W) -> Box<dyn tracing::Subscriber + Send + Sync>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "weight_tracker={level},tower_http={level}",
                level = self.level
            ))
        });

        let registry = tracing_subscriber::registry().with(filter);

        if self.format.eq_ignore_ascii_case("json") {
            Box::new(registry.with(tracing_subscriber::fmt::layer().json().with_writer(writer)))
        } else {
            Box::new(registry.with(tracing_subscriber::fmt::layer().with_writer(writer)))
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from the first default location that exists, or the environment.
    ///
    /// A config file that exists but cannot be read or parsed is an error
    /// rather than a silent fallback to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("weight-tracker").join("config.toml")),
            Some(PathBuf::from("/etc/weight-tracker/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Load from an explicit path when given, otherwise the default locations
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::load_with_env(path)?,
            None => Self::load_default()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the selected storage mode cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.local {
            if self.storage.file_name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "storage.file_name must not be empty".to_string(),
                ));
            }
            return Ok(());
        }

        let has_token = self
            .storage
            .blob
            .token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        if !has_token {
            return Err(ConfigError::Invalid(
                "remote storage requires storage.blob.token or BLOB_READ_WRITE_TOKEN".to_string(),
            ));
        }

        if self.storage.blob.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "remote storage requires storage.blob.base_url".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Storage overrides
        if let Some(local) = var("TRACKER_USE_LOCAL_STORAGE") {
            self.storage.local = parse_flag(&local);
        }
        if let Some(data_dir) = var("TRACKER_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Some(file_name) = var("TRACKER_FILE_NAME") {
            self.storage.file_name = file_name;
        }
        if let Some(url) = var("TRACKER_BLOB_URL") {
            self.storage.blob.base_url = url;
        }
        if let Some(pathname) = var("TRACKER_BLOB_PATHNAME") {
            self.storage.blob.pathname = pathname;
        }
        if let Some(token) = var("BLOB_READ_WRITE_TOKEN") {
            self.storage.blob.token = Some(token);
        }

        // API overrides
        if let Some(host) = var("TRACKER_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("TRACKER_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }
        if let Some(ui_dir) = var("TRACKER_UI_DIR") {
            self.api.ui_dir = Some(ui_dir);
        }

        // Logging overrides
        if let Some(level) = var("TRACKER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("TRACKER_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(value.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off")
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Weight Tracker Configuration
#
# Environment variables override these settings:
# - TRACKER_USE_LOCAL_STORAGE
# - TRACKER_DATA_DIR
# - TRACKER_FILE_NAME
# - TRACKER_BLOB_URL
# - TRACKER_BLOB_PATHNAME
# - BLOB_READ_WRITE_TOKEN
# - TRACKER_API_HOST
# - TRACKER_API_PORT
# - TRACKER_UI_DIR
# - TRACKER_LOG_LEVEL
# - TRACKER_LOG_FORMAT

[storage]
# true: keep the document on local disk; false: use the remote blob store
local = true

# Directory holding the document file
data_dir = "./data"

# Document file name
file_name = "weight-tracker.json"

[storage.blob]
# Blob store base URL
base_url = "https://blob.vercel-storage.com"

# Object name of the document
pathname = "weight-tracker.json"

# Read-write token (prefer BLOB_READ_WRITE_TOKEN)
# token = ""

# Request timeout in milliseconds
request_timeout_ms = 10000

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 3000

# Allowed CORS origins (empty: any origin)
cors_origins = []

# Request timeout in seconds
request_timeout_secs = 30

# Maximum request body size in bytes
max_body_size = 2097152

# Directory with the built UI, served at /
# ui_dir = "./tracker-ui/dist"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
