//! Error types and Result aliases for csnotify.
//!
//! This module defines the error hierarchy used throughout the crate.
//! All public functions return `Result<T, Error>` or `Result<T>`.
//! Per-path fetch failures are not returned from any call; they travel on
//! the watcher's error stream as [`SourceError`] values.
//! `Error::Io` comes from the binary writing metrics to stdout.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Result type alias using csnotify's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for csnotify operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Watcher usage or lifecycle error.
    #[error("watcher error: {0}")]
    Watcher(#[from] WatcherError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Watcher errors.
#[derive(Error, Debug)]
pub enum WatcherError {
    /// The path is not of the form `<scheme>://<container>/<name>`.
    #[error("invalid watch path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// The path uses a scheme the fingerprint source does not serve.
    #[error("unsupported scheme in '{path}': expected '{expected}://'")]
    UnsupportedScheme { path: String, expected: String },

    /// The background polling task panicked or was aborted.
    #[error("polling task failed: {0}")]
    TaskFailed(String),
}

/// Error code reported by the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The object does not exist.
    NotFound,
    /// Credentials were rejected or lack access to the object.
    PermissionDenied,
    /// The backend throttled the request.
    RateLimited,
    /// Any other backend-specific code.
    Other(String),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("NotFound"),
            Self::PermissionDenied => f.write_str("PermissionDenied"),
            Self::RateLimited => f.write_str("RateLimited"),
            Self::Other(code) => f.write_str(code),
        }
    }
}

/// Fingerprint fetch errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The backend answered with an error code.
    #[error("backend error [{code}] for '{path}': {message}")]
    Backend {
        path: String,
        code: ErrorCode,
        message: String,
    },

    /// The request never produced a backend answer.
    #[error("transport error for '{path}': {reason}")]
    Transport { path: String, reason: String },

    /// The object metadata carried no usable fingerprint.
    #[error("no fingerprint in metadata for '{path}'")]
    MissingFingerprint { path: String },

    /// The fetch did not finish within the configured timeout.
    #[error("fetching '{path}' timed out after {timeout:?}")]
    Timeout { path: String, timeout: Duration },
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl WatcherError {
    /// Create an invalid-path error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl SourceError {
    /// Create a backend error.
    pub fn backend(path: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Backend {
            path: path.into(),
            code,
            message: message.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transport {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Backend error code, if the backend reported one.
    #[must_use]
    pub const fn code(&self) -> Option<&ErrorCode> {
        match self {
            Self::Backend { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Path of the object the fetch was for.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Backend { path, .. }
            | Self::Transport { path, .. }
            | Self::MissingFingerprint { path }
            | Self::Timeout { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests;
