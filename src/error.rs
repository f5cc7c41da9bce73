//! Error types for snapshot fetching.

use thiserror::Error;

/// Errors that can occur while fetching the tick ring buffer.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The response was not a readable tick buffer.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The source has no more snapshots to give.
    #[error("Source closed")]
    Closed,
}

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The endpoint could not be reached or did not answer in time.
    Transport,
    /// The endpoint answered with something other than a 100-slot buffer.
    Parse,
}

impl FetchError {
    /// Returns the kind of failure.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Parse(_) => FetchErrorKind::Parse,
            FetchError::Http(_)
            | FetchError::Connection(_)
            | FetchError::Timeout
            | FetchError::Closed => FetchErrorKind::Transport,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Parse(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}
