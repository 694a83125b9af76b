//! Minimal GitHub REST client for repository and Pages setup.

use std::time::Duration;

use http::header::{ACCEPT, AUTHORIZATION, HeaderValue, USER_AGENT};
use http::{Method, StatusCode};

use super::GitHubError;
use crate::webhook::{HttpClient, HttpRequest, HttpResponse};

const GITHUB_JSON: &str = "application/vnd.github+json";
const CLIENT_AGENT: &str = concat!("pagesmith/", env!("CARGO_PKG_VERSION"));

/// Account and endpoint settings for the REST client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubSettings {
    /// API root, `https://api.github.com` in production.
    pub api_base: url::Url,
    /// Account owning the generated repositories.
    pub owner: String,
    /// Personal access token with `repo` and `pages` scope.
    pub token: String,
    /// Timeout for each REST call.
    pub timeout: Duration,
}

/// GitHub REST client scoped to one owner account.
///
/// All calls send the JSON media type, a bearer token and a user agent.
#[derive(Debug)]
pub struct GitHubApi<H> {
    client: H,
    settings: GitHubSettings,
}

impl<H: HttpClient> GitHubApi<H> {
    /// Creates a client.
    #[must_use]
    pub const fn new(client: H, settings: GitHubSettings) -> Self {
        Self { client, settings }
    }

    /// Returns the account and endpoint settings.
    #[must_use]
    pub const fn settings(&self) -> &GitHubSettings {
        &self.settings
    }

    /// Creates the repository if it does not exist, otherwise makes it public.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError`] if a call fails or GitHub answers with an
    /// unexpected status.
    pub async fn ensure_repo_public(&self, repo: &str) -> Result<(), GitHubError> {
        let repo_path = format!("repos/{}/{repo}", self.settings.owner);
        let response = self.send(Method::GET, &repo_path, None).await?;

        match response.status {
            StatusCode::NOT_FOUND => {
                tracing::info!(repo, "Creating repository");
                let body = serde_json::json!({
                    "name": repo,
                    "private": false,
                    "auto_init": false,
                });
                self.send_expecting_success(Method::POST, "user/repos", body)
                    .await?;
            }
            StatusCode::OK => {
                tracing::debug!(repo, "Repository exists, ensuring it is public");
                let body = serde_json::json!({ "private": false });
                self.send_expecting_success(Method::PATCH, &repo_path, body)
                    .await?;
            }
            _ => return Err(status_error(Method::GET, &repo_path, &response)),
        }

        Ok(())
    }

    /// Enables GitHub Pages with the workflow build type.
    ///
    /// Idempotent: an existing site is left alone, and a concurrent create
    /// (409) counts as success.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError`] if a call fails or GitHub answers with an
    /// unexpected status.
    pub async fn ensure_pages_enabled(&self, repo: &str) -> Result<(), GitHubError> {
        let pages_path = format!("repos/{}/{repo}/pages", self.settings.owner);
        let response = self.send(Method::GET, &pages_path, None).await?;

        match response.status {
            StatusCode::OK => return Ok(()),
            StatusCode::NOT_FOUND => {}
            _ => return Err(status_error(Method::GET, &pages_path, &response)),
        }

        tracing::info!(repo, "Enabling GitHub Pages");
        let body = serde_json::json!({ "build_type": "workflow" });
        let response = self.send(Method::POST, &pages_path, Some(&body)).await?;

        match response.status {
            StatusCode::CREATED | StatusCode::CONFLICT => Ok(()),
            _ => Err(status_error(Method::POST, &pages_path, &response)),
        }
    }

    /// Returns the SHA of the head commit of `branch`.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError`] if the call fails or the response has no `sha`.
    pub async fn latest_commit_sha(&self, repo: &str, branch: &str) -> Result<String, GitHubError> {
        let path = format!("repos/{}/{repo}/commits/{branch}", self.settings.owner);
        let response = self.send(Method::GET, &path, None).await?;
        if response.status.as_u16() >= 300 {
            return Err(status_error(Method::GET, &path, &response));
        }

        let value = response
            .json()
            .map_err(|e| GitHubError::InvalidResponse {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        value
            .get("sha")
            .and_then(serde_json::Value::as_str)
            .map(ToString::to_string)
            .ok_or(GitHubError::InvalidResponse {
                path,
                reason: "missing sha".to_string(),
            })
    }

    async fn send_expecting_success(
        &self,
        method: Method,
        path: &str,
        body: serde_json::Value,
    ) -> Result<HttpResponse, GitHubError> {
        let response = self.send(method.clone(), path, Some(&body)).await?;
        if response.status.as_u16() >= 300 {
            return Err(status_error(method, path, &response));
        }
        Ok(response)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<HttpResponse, GitHubError> {
        let url = self.url(path)?;
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.settings.token))
            .map_err(|_| GitHubError::InvalidUrl("token is not a valid header value".to_string()))?;

        let mut request = HttpRequest::new(method, url)
            .with_header(ACCEPT, HeaderValue::from_static(GITHUB_JSON))
            .with_header(AUTHORIZATION, auth)
            .with_header(USER_AGENT, HeaderValue::from_static(CLIENT_AGENT))
            .with_timeout(self.settings.timeout);
        if let Some(body) = body {
            request = request.with_json(body);
        }

        Ok(self.client.request(request).await?)
    }

    fn url(&self, path: &str) -> Result<url::Url, GitHubError> {
        let base = self.settings.api_base.as_str().trim_end_matches('/');
        url::Url::parse(&format!("{base}/{path}")).map_err(|e| GitHubError::InvalidUrl(e.to_string()))
    }
}

fn status_error(method: Method, path: &str, response: &HttpResponse) -> GitHubError {
    GitHubError::Status {
        method,
        path: path.to_string(),
        status: response.status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    }
}
