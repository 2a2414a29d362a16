//! Error types for query submission

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to the analysis service.
///
/// These never escape to the user: the session recovers every one of them
/// into the synthetic error payload.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network-level failure (unreachable host, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}
