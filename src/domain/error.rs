//! Error types for feedscope.
//!
//! This module defines the centralized error type [`FeedscopeError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! The filter store, the query codec and the sync controller never produce errors:
//! malformed input degrades to defaults. Errors only come out of configuration
//! loading, preference storage and the command line front end.

use thiserror::Error;

/// The main error type for feedscope operations.
///
/// # Examples
///
/// ```
/// use feedscope::FeedscopeError;
///
/// fn read_storage() -> Result<(), FeedscopeError> {
///     Err(FeedscopeError::Storage("failed to read file".to_string()))
/// }
///
/// assert!(read_storage().is_err());
/// ```
#[derive(Debug, Error)]
pub enum FeedscopeError {
    /// Preference storage could not be read or written.
    ///
    /// Inside a running session this is logged and swallowed; persistence is
    /// best-effort.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A base URL supplied by configuration or the command line is not a valid URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A TOML configuration file could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A specialized `Result` type for feedscope operations.
pub type Result<T> = std::result::Result<T, FeedscopeError>;
