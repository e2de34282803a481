//! Error types for convoylog.
//!
//! This module defines all error types used throughout the convoylog crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::location::LocationError;

/// The main error type for convoylog operations.
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

    /// Schema bookkeeping is corrupt or unusable.
    #[error("schema bookkeeping is corrupt: {message}")]
    Schema {
        /// Description of what went wrong.
        message: String,
    },

    /// Failed to read a persisted collection.
    #[error("failed to read collection '{key}': {message}")]
    StoreRead {
        /// The collection key that was being read.
        key: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// Failed to write a persisted collection.
    #[error("failed to write collection '{key}': {message}")]
    StoreWrite {
        /// The collection key that was being written.
        key: &'static str,
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

    // === Location Errors ===
    /// A location lookup failed.
    #[error(transparent)]
    Location(#[from] LocationError),

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

/// A specialized Result type for convoylog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a collection read error.
    #[must_use]
    pub fn store_read(key: &'static str, message: impl Into<String>) -> Self {
        Self::StoreRead {
            key,
            message: message.into(),
        }
    }

    /// Create a collection write error.
    #[must_use]
    pub fn store_write(key: &'static str, message: impl Into<String>) -> Self {
        Self::StoreWrite {
            key,
            message: message.into(),
        }
    }

    /// Check if this error came from reading a persisted collection.
    #[must_use]
    pub fn is_store_read(&self) -> bool {
        matches!(self, Self::StoreRead { .. })
    }

    /// Check if this error came from writing a persisted collection.
    #[must_use]
    pub fn is_store_write(&self) -> bool {
        matches!(self, Self::StoreWrite { .. })
    }

    /// Check if this error is a failed location lookup.
    #[must_use]
    pub fn is_location(&self) -> bool {
        matches!(self, Self::Location(_))
    }
}
