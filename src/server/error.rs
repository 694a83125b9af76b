//! Error responses for the HTTP surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::github::PublishError;
use crate::site::SiteError;

/// Errors a request handler can return.
///
/// Every variant renders as `{"error": message}` with a matching status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The shared secret was missing or wrong.
    #[error("Invalid secret")]
    Unauthorized,

    /// The request body failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// Rendering the site failed.
    #[error("Site generation failed: {0}")]
    Site(#[from] SiteError),

    /// Pushing the site failed.
    #[error("Publishing failed: {0}")]
    Publish(#[from] PublishError),

    /// The callback payload could not be encoded.
    #[error("Failed to encode notification: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status for this error.
    ///
    /// GitHub API failures are upstream faults (502); local git and I/O
    /// failures are ours (500).
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Publish(PublishError::GitHub(_)) => StatusCode::BAD_GATEWAY,
            Self::Site(_) | Self::Publish(_) | Self::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
