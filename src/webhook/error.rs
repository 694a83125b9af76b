//! Error types for HTTP operations and delivery attempts.

use thiserror::Error;

/// Error type for HTTP operations.
///
/// Describes what went wrong at the transport level without dictating
/// recovery strategy.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the per-request timeout.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Why a single notification attempt did not deliver.
#[derive(Debug, Error)]
pub enum AttemptFailure {
    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// The server answered with something other than 200.
    #[error("Unexpected status {status}")]
    Status {
        /// HTTP status code received
        status: http::StatusCode,
        /// Response body, if valid UTF-8
        body: Option<String>,
    },
}
