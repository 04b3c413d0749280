//! Unified error types for almanack.
//!
//! Expected absence is never an error: a missing virtue, an empty queue, an
//! expired undo all resolve to `None`/`false`/empty at the call site. The
//! variants here cover the cases that do propagate: storage and
//! serialization failures, bad configuration, and hardened lifecycle or
//! input violations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for almanack operations.
#[derive(Error, Debug)]
pub enum AlmanackError {
    /// I/O errors from the state file gateway.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Snapshot encode/decode errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Practice lifecycle violations (completing with no active week,
    /// starting over an active week).
    #[error("invalid state: {message}")]
    InvalidState { message: String },

    /// Rejected input (note over the length cap, unknown virtue id).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// A specialized Result type for almanack operations.
pub type Result<T> = std::result::Result<T, AlmanackError>;

/// Process exit codes for the CLI binary.
pub mod exit_codes {
    /// Command succeeded.
    pub const SUCCESS: i32 = 0;
    /// Command failed or input was rejected.
    pub const ERROR: i32 = 1;
    /// The process panicked.
    pub const CRASH: i32 = 2;
}

impl AlmanackError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<io::Error> for AlmanackError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AlmanackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = AlmanackError::storage(
            "/tmp/state.json",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("/tmp/state.json"));
    }

    #[test]
    fn test_serde_error_display() {
        let err = AlmanackError::serde("invalid JSON");
        assert_eq!(err.to_string(), "serialization error: invalid JSON");
    }

    #[test]
    fn test_config_error_display() {
        let err = AlmanackError::config("invalid TOML");
        assert_eq!(err.to_string(), "config error: invalid TOML");
    }

    #[test]
    fn test_invalid_state_error_display() {
        let err = AlmanackError::invalid_state("no active week to complete");
        assert!(err.to_string().contains("invalid state"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = AlmanackError::validation("note exceeds 140 characters");
        assert_eq!(
            err.to_string(),
            "validation error: note exceeds 140 characters"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: AlmanackError = io_err.into();
        assert!(matches!(err, AlmanackError::Storage { .. }));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: AlmanackError = json_err.into();
        assert!(matches!(err, AlmanackError::Serde { .. }));
    }
}
