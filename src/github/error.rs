//! Error types for GitHub publishing.

use thiserror::Error;

use crate::webhook::HttpError;

/// Error type for GitHub REST calls.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The request never produced a response.
    #[error("GitHub request failed: {0}")]
    Http(#[from] HttpError),

    /// GitHub answered with an unexpected status.
    #[error("GitHub API {method} {path} failed: {status} {body}")]
    Status {
        /// HTTP method of the failed call
        method: http::Method,
        /// API path of the failed call
        path: String,
        /// Status received
        status: http::StatusCode,
        /// Response body (lossy UTF-8)
        body: String,
    },

    /// The response body was not what the endpoint documents.
    #[error("Unexpected GitHub response for {path}: {reason}")]
    InvalidResponse {
        /// API path of the call
        path: String,
        /// What was wrong
        reason: String,
    },

    /// A URL could not be built from the configured base.
    #[error("Invalid GitHub URL: {0}")]
    InvalidUrl(String),
}

/// Error type for the git push sequence.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Creating the scratch directory or writing a file failed.
    #[error("Failed to prepare working tree: {0}")]
    Io(#[from] std::io::Error),

    /// A bundle path tried to escape the working tree.
    #[error("Refusing to write outside the working tree: {0}")]
    UnsafePath(String),

    /// A git command could not be started or exited unsuccessfully.
    #[error("git {step} failed: {detail}")]
    Git {
        /// Which git step failed (`init`, `push`, ...)
        step: String,
        /// Exit status or spawn error, with stderr when available
        detail: String,
    },

    /// A GitHub REST call failed.
    #[error(transparent)]
    GitHub(#[from] GitHubError),
}
