//! Error types for Tacklefront
//!
//! Covers the storefront HTTP boundary, configuration and terminal I/O.

use thiserror::Error;

/// Main error type for Tacklefront operations
#[derive(Error, Debug)]
pub enum TackleError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Tacklefront operations
pub type Result<T> = std::result::Result<T, TackleError>;

impl TackleError {
    /// Check if this error came from the wire rather than from our own
    /// request construction. Transport errors are worth a user retry.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TackleError::Request { .. } | TackleError::Status { .. } | TackleError::Decode { .. }
        )
    }
}
