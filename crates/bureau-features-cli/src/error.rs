//! Error types for the feature CLI

use bureau_features_core::FeatureError;
use thiserror::Error;

use crate::cli::ExitCode;

/// Errors surfaced by CLI commands
#[derive(Error, Debug)]
pub enum CliError {
    /// Arguments or inline values the engine cannot use
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing, unreadable or unwritable file
    #[error("File error: {0}")]
    FileError(String),

    /// Input that is not the expected CSV or JSON
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CliError {
    pub fn file(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        CliError::FileError(format!("'{}': {}", path.display(), err))
    }

    /// Check if this is a caller-side error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CliError::InvalidInput(_) | CliError::FileError(_) | CliError::ParseError(_)
        )
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::InvalidInput(_) | CliError::ParseError(_) => ExitCode::InvalidInput,
            CliError::FileError(_) => ExitCode::FileError,
            CliError::SerializationError(_) | CliError::InternalError(_) => ExitCode::InternalError,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::FileError(err.to_string())
    }
}

impl From<csv::Error> for CliError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            CliError::FileError(err.to_string())
        } else {
            CliError::ParseError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::SerializationError(err.to_string())
    }
}

impl From<FeatureError> for CliError {
    fn from(err: FeatureError) -> Self {
        if err.is_user_error() {
            CliError::InvalidInput(err.to_string())
        } else {
            CliError::InternalError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(CliError::InvalidInput("x".into()).exit_code(), ExitCode::InvalidInput);
        assert_eq!(CliError::ParseError("x".into()).exit_code(), ExitCode::InvalidInput);
        assert_eq!(CliError::FileError("x".into()).exit_code(), ExitCode::FileError);
        assert_eq!(CliError::InternalError("x".into()).exit_code(), ExitCode::InternalError);
    }

    #[test]
    fn test_feature_error_conversion() {
        let err: CliError = FeatureError::invalid_reference("soon").into();
        assert!(matches!(err, CliError::InvalidInput(_)));
        assert!(err.is_user_error());
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn test_json_error_is_parse_error() {
        let err: CliError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, CliError::ParseError(_)));
    }
}
