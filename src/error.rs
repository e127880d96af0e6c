//! Error types for gator.

use thiserror::Error;

/// Failure while fetching or decoding a feed.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, timeout or body read failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("unexpected HTTP status: {0}")]
    Status(String),

    /// The body is not a decodable RSS document.
    #[error("failed to decode feed: {0}")]
    Decode(String),

    /// The body exceeds the configured size limit.
    #[error("feed too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: u64, max: u64 },
}

/// Common error type for gator.
#[derive(Error, Debug)]
pub enum GatorError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Feed fetch error.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Unique resource already exists.
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// Missing or malformed command arguments.
    #[error("usage: {0}")]
    Usage(String),

    /// The command requires a logged-in user.
    #[error("not logged in; run `login <name>` or `register <name>` first")]
    Unauthenticated,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for GatorError {
    fn from(e: sqlx::Error) -> Self {
        GatorError::Database(e.to_string())
    }
}

/// Result type alias for gator operations.
pub type Result<T> = std::result::Result<T, GatorError>;
