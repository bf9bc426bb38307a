//! Error types for zipstamp_core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using zipstamp_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while allocating paths, creating files or archiving.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred during file operations.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Input path does not exist.
    #[error("Path does not exist: {path}")]
    NotFound { path: PathBuf },

    /// Archiver was given something other than a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// File creation target is already taken.
    #[error("Path already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// Input exists but is neither a regular file nor a directory.
    #[error("Unsupported input at {path}: {reason}")]
    UnsupportedInput { path: PathBuf, reason: String },

    /// The zip writer rejected an operation.
    #[error("Archive error: {reason}")]
    Archive { reason: String },

    /// Search pattern failed to compile.
    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// No validation rule registered under the key.
    #[error("No validation rule defined for '{key}'")]
    UndefinedKey { key: String },
}

impl Error {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Error::NotFound { path: path.into() }
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Error::NotADirectory { path: path.into() }
    }

    /// Create an AlreadyExists error.
    pub fn already_exists(path: impl Into<PathBuf>) -> Self {
        Error::AlreadyExists { path: path.into() }
    }

    /// Create an UnsupportedInput error.
    pub fn unsupported_input(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::UnsupportedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an Archive error.
    pub fn archive(reason: impl Into<String>) -> Self {
        Error::Archive {
            reason: reason.into(),
        }
    }

    /// Create an InvalidPattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create an UndefinedKey error.
    pub fn undefined_key(key: impl Into<String>) -> Self {
        Error::UndefinedKey { key: key.into() }
    }
}

// Additional From implementations for external error types

impl From<tempfile::PersistError> for Error {
    fn from(err: tempfile::PersistError) -> Self {
        Error::Io { source: err.error }
    }
}

impl From<ignore::Error> for Error {
    fn from(err: ignore::Error) -> Self {
        // ignore::Error can wrap an io::Error or be a path error
        match err.io_error() {
            Some(io_err) => Error::Io {
                source: std::io::Error::new(io_err.kind(), io_err.to_string()),
            },
            None => Error::Io {
                source: std::io::Error::other(err.to_string()),
            },
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(source) => Error::Io { source },
            other => Error::archive(other.to_string()),
        }
    }
}
