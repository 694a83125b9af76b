//! Error types for page generation.

use thiserror::Error;

use crate::webhook::HttpError;

/// Error type for site generation.
#[derive(Debug, Error)]
pub enum SiteError {
    /// A built-in template failed to compile or render.
    #[error("Template error: {0}")]
    Template(String),
}

/// Error type for the language-model page generator.
///
/// These never reach the HTTP caller; the generator falls back to the plain
/// page and logs the error instead.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The completion request failed at the transport level.
    #[error("LLM request failed: {0}")]
    Http(#[from] HttpError),

    /// The completion endpoint answered with a non-success status.
    #[error("LLM endpoint returned {status}")]
    Status {
        /// HTTP status code received
        status: http::StatusCode,
    },

    /// The response did not contain usable page content.
    #[error("LLM response unusable: {0}")]
    InvalidResponse(String),
}
