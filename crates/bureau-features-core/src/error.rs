//! Error types for the feature engine
//!
//! Field-level data problems (bad dates, non-numeric amounts) never surface
//! here; they are absorbed by the engine and show up as sentinel values.
//! Only precondition violations reach the caller.

use thiserror::Error;

/// Main error type for feature computation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    /// The reference (application) timestamp was absent or blank
    #[error("application_date is required")]
    MissingReferenceTimestamp,

    /// The reference (application) timestamp could not be parsed
    #[error("Invalid application_date: {0}")]
    InvalidReferenceTimestamp(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FeatureError {
    /// Create an invalid reference timestamp error
    pub fn invalid_reference(value: impl Into<String>) -> Self {
        FeatureError::InvalidReferenceTimestamp(value.into())
    }

    /// Check if this is a caller-side error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            FeatureError::MissingReferenceTimestamp | FeatureError::InvalidReferenceTimestamp(_)
        )
    }
}

impl From<serde_json::Error> for FeatureError {
    fn from(err: serde_json::Error) -> Self {
        FeatureError::Serialization(err.to_string())
    }
}

/// Result type alias for feature operations
pub type Result<T> = std::result::Result<T, FeatureError>;
