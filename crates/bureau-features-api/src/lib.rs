//! Bureau Features API
//!
//! HTTP service wrapping the credit-bureau feature engine.
//!
//! ## Architecture
//!
//! 1. **Config** (`config/`): defaults, TOML file and `BUREAU_FEATURES_*`
//!    environment/flag overrides.
//! 2. **Handler** (`handler/`): axum routes, error mapping and middleware.
//! 3. **Telemetry** (`telemetry/`): tracing setup and Prometheus metrics.
//!
//! Requests are independent: the engine is pure and the only shared state
//! is immutable configuration plus thread-safe metric collectors.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bureau_features_api::{create_router, AppState, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
//!     let app = create_router(AppState::new(config)?);
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod handler;
pub mod telemetry;

pub use config::{ConfigError, LogFormat, ServerArgs, ServerConfig};
pub use handler::{
    create_router, ApiError, ErrorInfo, ErrorResponse, FeatureRequest, FeatureResponse,
    HealthResponse, HealthStatus, ServiceInfo,
};
pub use telemetry::{init_tracing, FeatureMetrics, TelemetryError};

use bureau_features_core::FeatureEngine;
use std::sync::Arc;
use std::time::Instant;

/// Service name reported by `/` and `/health`
pub const SERVICE_NAME: &str = "ML Feature Engineering Service";

/// State shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub engine: FeatureEngine,
    pub metrics: Arc<FeatureMetrics>,
    pub config: Arc<ServerConfig>,
    /// Start time for uptime reporting
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, TelemetryError> {
        Ok(Self {
            engine: FeatureEngine::new(),
            metrics: Arc::new(FeatureMetrics::new()?),
            config: Arc::new(config),
            start_time: Instant::now(),
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::new(ServerConfig::default()).expect("metrics registry")
    }
}
