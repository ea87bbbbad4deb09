//! Server configuration
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. an optional TOML file (`--config` / `BUREAU_FEATURES_CONFIG`)
//! 3. command-line flags and their `BUREAU_FEATURES_*` environment variables

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Resolved server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Log output format
    pub log_format: LogFormat,
    /// Whether `/metrics` is served
    pub metrics_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8002,
            cors_origins: vec![
                "http://localhost:5002".to_string(),
                "http://127.0.0.1:5002".to_string(),
            ],
            max_body_size: 1024 * 1024,
            request_timeout_ms: 30_000,
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve the final configuration from command-line arguments
    pub fn load(args: &ServerArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(args);
        Ok(config)
    }

    fn apply_overrides(&mut self, args: &ServerArgs) {
        if let Some(host) = &args.host {
            self.host = host.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if !args.cors_origins.is_empty() {
            self.cors_origins = args.cors_origins.clone();
        }
        if let Some(size) = args.max_body_size {
            self.max_body_size = size;
        }
        if let Some(timeout) = args.request_timeout_ms {
            self.request_timeout_ms = timeout;
        }
        if let Some(format) = args.log_format {
            self.log_format = format;
        }
        if args.disable_metrics {
            self.metrics_enabled = false;
        }
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Command-line arguments for the server binary
#[derive(Parser, Debug, Default)]
#[command(name = "bureau-features-server")]
#[command(about = "Credit-bureau feature engineering service", long_about = None)]
#[command(version)]
pub struct ServerArgs {
    /// Path to a TOML config file
    #[arg(short, long, env = "BUREAU_FEATURES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long, env = "BUREAU_FEATURES_HOST")]
    pub host: Option<String>,

    /// Port to bind
    #[arg(short, long, env = "BUREAU_FEATURES_PORT")]
    pub port: Option<u16>,

    /// Allowed CORS origins (comma separated)
    #[arg(long, env = "BUREAU_FEATURES_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes
    #[arg(long, env = "BUREAU_FEATURES_MAX_BODY_SIZE")]
    pub max_body_size: Option<usize>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "BUREAU_FEATURES_REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: Option<u64>,

    /// Log output format
    #[arg(long, value_enum, env = "BUREAU_FEATURES_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Do not serve /metrics
    #[arg(long)]
    pub disable_metrics: bool,
}
