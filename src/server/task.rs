//! Task request validation and the evaluation callback payload.

use serde::Serialize;
use serde_json::Value;

use super::ApiError;
use crate::github::PublishedSite;
use crate::site::Attachment;

const DEFAULT_ROUND: u64 = 1;

/// A validated `POST /task` body.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRequest {
    /// Requester email, echoed back in the callback.
    pub email: Option<String>,
    /// Task identifier, also the source of the repository name.
    pub task: String,
    /// Round number, 1 when absent.
    pub round: u64,
    /// Opaque nonce echoed back in the callback.
    pub nonce: Value,
    /// Free-form description of the page to build.
    pub brief: String,
    /// Where the callback is delivered.
    pub evaluation_url: url::Url,
    /// Attachments as sent.
    pub attachments: Vec<Attachment>,
}

impl TaskRequest {
    /// Validates a raw request body.
    ///
    /// Checks run in a fixed order: the secret first, then `task`,
    /// `evaluation_url` and `round`. Only the first failure is reported.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] on a secret mismatch, or
    /// [`ApiError::BadRequest`] naming the first invalid field.
    pub fn parse(body: &Value, secret: &str) -> Result<Self, ApiError> {
        if body.get("secret").and_then(Value::as_str) != Some(secret) {
            return Err(ApiError::Unauthorized);
        }

        let task = body
            .get("task")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| invalid("task"))?;

        let evaluation_url = body
            .get("evaluation_url")
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
            .and_then(|u| url::Url::parse(u).ok())
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .ok_or_else(|| invalid("evaluation_url"))?;

        let round = parse_round(body.get("round")).ok_or_else(|| invalid("round"))?;

        // Malformed attachments are dropped rather than failing the task.
        let attachments = body
            .get("attachments")
            .and_then(|a| serde_json::from_value::<Vec<Attachment>>(a.clone()).ok())
            .unwrap_or_default();

        Ok(Self {
            email: body.get("email").and_then(Value::as_str).map(ToString::to_string),
            task: task.to_string(),
            round,
            nonce: body.get("nonce").cloned().unwrap_or(Value::Null),
            brief: body
                .get("brief")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            evaluation_url,
            attachments,
        })
    }
}

fn invalid(field: &str) -> ApiError {
    ApiError::BadRequest(format!("Missing or invalid '{field}'"))
}

/// Accepts an absent/null round, a non-negative integer, or a numeric string.
fn parse_round(value: Option<&Value>) -> Option<u64> {
    match value {
        None | Some(Value::Null) => Some(DEFAULT_ROUND),
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    }
}

/// Body POSTed to the evaluation URL once the site is pushed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPayload {
    pub email: Option<String>,
    pub task: String,
    pub round: u64,
    pub nonce: Value,
    pub repo_url: String,
    pub commit_sha: String,
    pub pages_url: String,
}

impl NotificationPayload {
    /// Combines the request with where its site ended up.
    #[must_use]
    pub fn new(request: &TaskRequest, site: &PublishedSite) -> Self {
        Self {
            email: request.email.clone(),
            task: request.task.clone(),
            round: request.round,
            nonce: request.nonce.clone(),
            repo_url: site.repo_url.clone(),
            commit_sha: site.commit_sha.clone(),
            pages_url: site.pages_url.clone(),
        }
    }

    /// Serializes the payload for the notifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be represented as JSON.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
