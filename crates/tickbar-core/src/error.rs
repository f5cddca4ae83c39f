//! Core error types for tickbar-core.
//!
//! Missing or corrupt state files are not errors: loaders fall back to the
//! default record. Everything that can actually abort an action lives here.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tickbar-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Bad user input for a single action
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Could not resolve or create a state directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),

    /// IO errors
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Validation errors for user-supplied values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Alarm time not in `HH:MM` form
    #[error("Invalid time format '{0}'. Use HH:MM")]
    InvalidTime(String),

    /// Duration not understood (`90s`, `10m`, `1h30m`, `25`)
    #[error("Invalid duration format '{0}'. Use e.g. 10m, 1h30m, 90s")]
    InvalidDuration(String),

    /// Date not in `YYYY-MM-DD` form
    #[error("Invalid date '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),

    /// No record with this id
    #[error("No {kind} with id {id}")]
    NotFound { kind: &'static str, id: u64 },
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the error was caused by bad user input rather than storage.
    pub fn is_user_error(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_read_like_user_messages() {
        let err = CoreError::from(ValidationError::InvalidTime("25:99".into()));
        assert!(err.is_user_error());
        assert_eq!(err.to_string(), "Invalid time format '25:99'. Use HH:MM");
    }

    #[test]
    fn io_errors_are_not_user_errors() {
        let err = CoreError::io(
            "/nowhere",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(!err.is_user_error());
        assert!(err.to_string().contains("/nowhere"));
    }
}
