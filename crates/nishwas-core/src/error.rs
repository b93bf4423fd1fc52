//! Core error types for nishwas-core.
//!
//! This module defines the error hierarchy using thiserror, plus the shared
//! failure taxonomy ([`ErrorKind`]) used when reporting failures to the
//! presentation layer. Expected validation failures are never errors: they
//! travel as [`crate::model::ValidationReport`] values inside a successful
//! result.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for nishwas-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Export bundle import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Errors raised when importing an export bundle.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The bundle was produced by an incompatible app version
    #[error("Unsupported export version '{0}'")]
    UnsupportedVersion(String),

    /// The bundle is structurally broken
    #[error("Malformed export bundle: {0}")]
    Malformed(String),
}

/// Shared failure taxonomy for caller-facing reporting.
///
/// `Network` and `Permission` are reserved for the host application's
/// notification and file-picker layers; nothing in this core produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Storage,
    Network,
    Permission,
    Unknown,
}

/// A classified, display-ready failure handed to the presentation layer.
///
/// Carries no source chain: by the time an `AppError` exists the operation
/// has already been rolled up to "did not take effect".
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    /// Classify a core error into the shared taxonomy.
    pub fn classify(err: &CoreError) -> Self {
        let kind = match err {
            CoreError::Storage(_) | CoreError::Io(_) | CoreError::Json(_) => ErrorKind::Storage,
            CoreError::Import(_) => ErrorKind::Validation,
            CoreError::Custom(_) => ErrorKind::Unknown,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_classify_as_storage() {
        let err = CoreError::Storage(StorageError::Locked);
        let app = AppError::classify(&err);
        assert_eq!(app.kind, ErrorKind::Storage);
        assert!(app.message.contains("locked"));
    }

    #[test]
    fn test_import_errors_classify_as_validation() {
        let err = CoreError::Import(ImportError::UnsupportedVersion("2.0".into()));
        let app = AppError::classify(&err);
        assert_eq!(app.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_custom_errors_classify_as_unknown() {
        let err = CoreError::Custom("something odd".into());
        assert_eq!(AppError::classify(&err).kind, ErrorKind::Unknown);
    }
}
