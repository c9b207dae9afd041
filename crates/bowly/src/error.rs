//! Error types for bowly.
//!
//! This module defines the error type shared by storage, configuration,
//! backup files and the CLI.

use std::path::PathBuf;

use bowly_frames::FrameError;
use thiserror::Error;

/// The main error type for bowly operations.
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

    /// Failed to run database migrations.
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

    // === Game Errors ===
    /// A game record failed range checks.
    #[error("invalid game record: {message}")]
    RecordValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// A target score outside 0-300.
    #[error("target score must be between 0 and 300, got {0}")]
    InvalidTarget(f64),

    /// Frame entry was rejected.
    #[error("invalid frames: {0}")]
    Frames(#[from] FrameError),

    /// No record matched an id or date.
    #[error("no game record matches '{0}'")]
    RecordNotFound(String),

    // === Backup Errors ===
    /// A backup file did not have the expected shape.
    #[error("invalid backup file: {message}")]
    ImportFormat {
        /// Description of what is wrong with the file.
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

/// A specialized Result type for bowly operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a record validation error.
    #[must_use]
    pub fn record(message: impl Into<String>) -> Self {
        Self::RecordValidation {
            message: message.into(),
        }
    }

    /// Create a backup format error.
    #[must_use]
    pub fn import_format(message: impl Into<String>) -> Self {
        Self::ImportFormat {
            message: message.into(),
        }
    }

    /// Check if this error was caused by user input rather than the system.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::RecordValidation { .. }
                | Self::InvalidTarget(_)
                | Self::Frames(_)
                | Self::RecordNotFound(_)
                | Self::ImportFormat { .. }
        )
    }
}
