//! HTTP handler layer for the feature service
//!
//! - `routes`: route table, endpoint handlers and `ApiError`
//! - `middleware`: request logging and content-type enforcement
//!
//! Handlers are thin: they normalize the payload, call the engine and render
//! the record. No state survives a request except metrics.

pub mod middleware;
pub mod routes;

pub use middleware::{content_type_middleware, request_logging_middleware};
pub use routes::{
    calculate_features, calculate_features_from_json, create_router, health_check, metrics,
    root, ApiError,
};

use bureau_features_core::{ContractsPayload, FeatureRecord, TextField};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Feature calculation request.
///
/// `contracts` may be a JSON list or a JSON-encoded string; both endpoints
/// accept either.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureRequest {
    /// Applicant identifier, echoed back
    #[serde(default)]
    pub id: TextField,
    /// Reference timestamp for the features
    #[serde(default)]
    pub application_date: Option<String>,
    /// Contract history
    #[serde(default)]
    pub contracts: ContractsPayload,
}

/// Feature calculation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureResponse {
    pub id: TextField,
    pub application_date: String,
    #[serde(flatten)]
    pub features: FeatureRecord,
}

/// Error response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    pub error: ErrorInfo,
    pub metadata: ResponseMetadata,
}

impl ErrorResponse {
    pub fn new(error: ErrorInfo, request_id: String) -> Self {
        Self {
            success: false,
            error,
            metadata: ResponseMetadata::new(request_id),
        }
    }
}

/// Error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Response metadata for tracing and debugging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub request_id: String,
    /// RFC 3339 timestamp of response generation
    pub timestamp: String,
    pub version: String,
}

impl ResponseMetadata {
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Service description returned by `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub description: String,
    pub endpoints: BTreeMap<String, String>,
}

/// Liveness probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}
