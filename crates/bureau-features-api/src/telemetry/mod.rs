//! Telemetry for the feature service
//!
//! - `metrics` - Prometheus collectors for requests and feature outcomes
//! - log subscriber setup for the server binary

pub mod metrics;

pub use metrics::FeatureMetrics;

use thiserror::Error;

use crate::config::LogFormat;

/// Telemetry errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),

    #[error("Failed to encode metrics: {0}")]
    EncodingFailed(String),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `info`. Calling this twice is a no-op.
pub fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(?format, "Tracing initialized");
    }
}
