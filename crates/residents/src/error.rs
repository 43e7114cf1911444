//! Error types for residents.
//!
//! This module defines all error types used throughout the residents crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// The main error type for residents operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to bring the database schema up to date.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Register Errors ===
    /// A submitted resident failed field validation.
    #[error("invalid resident: {0}")]
    Validation(ValidationErrors),

    /// A row position does not address a resident in the list.
    #[error("no resident at position {position} (list has {len})")]
    PositionOutOfRange {
        /// The requested zero-based position.
        position: usize,
        /// Length of the list at the time of the request.
        len: usize,
    },

    /// Writing the exported document failed.
    #[error("export to {path} failed: {message}")]
    Export {
        /// Destination of the document.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for residents operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl Error {
    /// Create a position out of range error.
    #[must_use]
    pub fn position_out_of_range(position: usize, len: usize) -> Self {
        Self::PositionOutOfRange { position, len }
    }

    /// Create an export error.
    #[must_use]
    pub fn export(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Export {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Field-level errors, if this is a validation failure.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Check if this error is a stale or invalid row position.
    #[must_use]
    pub fn is_position_error(&self) -> bool {
        matches!(self, Self::PositionOutOfRange { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Field;

    #[test]
    fn test_position_error_display() {
        let err = Error::position_out_of_range(7, 3);
        assert_eq!(err.to_string(), "no resident at position 7 (list has 3)");
        assert!(err.is_position_error());
    }

    #[test]
    fn test_export_error_display() {
        let err = Error::export("/tmp/out.html", "disk full");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/out.html"));
        assert!(msg.contains("disk full"));
        assert!(!err.is_position_error());
    }

    #[test]
    fn test_validation_errors_accessor() {
        let mut errors = ValidationErrors::default();
        errors.insert(Field::Phone, "bad phone");
        let err: Error = errors.into();

        let fields = err.validation_errors().unwrap();
        assert_eq!(fields.get(Field::Phone), Some("bad phone"));
        assert!(err.to_string().contains("phone"));
    }

    #[test]
    fn test_validation_errors_accessor_none() {
        let err = Error::position_out_of_range(0, 0);
        assert!(err.validation_errors().is_none());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "slot_key must not be empty".to_string(),
        };
        assert!(err.to_string().contains("slot_key"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
