//! Pushes a site bundle to a fresh GitHub repository.

use std::path::{Component, Path, PathBuf};

use super::api::GitHubApi;
use super::error::PublishError;
use super::runner::{CommandRunner, TokioCommandRunner};
use crate::site::SiteBundle;
use crate::webhook::HttpClient;

const BRANCH: &str = "main";
const REDACTED: &str = "***";

/// Where a published site can be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedSite {
    /// Repository name.
    pub repo: String,
    /// SHA of the pushed commit as reported by GitHub.
    pub commit_sha: String,
    /// Browser URL of the repository.
    pub repo_url: String,
    /// GitHub Pages URL of the deployed site.
    pub pages_url: String,
}

/// Trait for publishing a bundle under a repository name.
///
/// The HTTP handler depends on this seam rather than on git directly.
pub trait Publisher: Send + Sync {
    /// Publishes `bundle` as the repository `repo`.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] if any git step or GitHub call fails.
    fn publish(
        &self,
        repo: &str,
        bundle: &SiteBundle,
    ) -> impl std::future::Future<Output = Result<PublishedSite, PublishError>> + Send;
}

impl<T: Publisher> Publisher for std::sync::Arc<T> {
    fn publish(
        &self,
        repo: &str,
        bundle: &SiteBundle,
    ) -> impl std::future::Future<Output = Result<PublishedSite, PublishError>> + Send {
        (**self).publish(repo, bundle)
    }
}

/// Publisher that commits the bundle in a scratch directory and pushes it
/// over HTTPS with the access token.
///
/// Each call starts from `git init`, so the remote ends up with a single
/// commit holding exactly the bundle.
#[derive(Debug)]
pub struct GitPublisher<H, R = TokioCommandRunner> {
    api: GitHubApi<H>,
    runner: R,
    email: String,
}

impl<H: HttpClient> GitPublisher<H, TokioCommandRunner> {
    /// Creates a publisher that runs the system `git`.
    #[must_use]
    pub fn new(api: GitHubApi<H>, email: impl Into<String>) -> Self {
        Self {
            api,
            runner: TokioCommandRunner,
            email: email.into(),
        }
    }
}

impl<H: HttpClient, R: CommandRunner> GitPublisher<H, R> {
    /// Replaces the command runner.
    #[must_use]
    pub fn with_runner<R2: CommandRunner>(self, runner: R2) -> GitPublisher<H, R2> {
        GitPublisher {
            api: self.api,
            runner,
            email: self.email,
        }
    }

    /// Browser URL of `repo`.
    #[must_use]
    pub fn repo_url(&self, repo: &str) -> String {
        format!("https://github.com/{}/{repo}", self.api.settings().owner)
    }

    /// GitHub Pages URL of `repo`.
    #[must_use]
    pub fn pages_url(&self, repo: &str) -> String {
        format!("https://{}.github.io/{repo}/", self.api.settings().owner)
    }

    fn remote_url(&self, repo: &str) -> String {
        let settings = self.api.settings();
        format!(
            "https://x-access-token:{}@github.com/{}/{repo}.git",
            settings.token, settings.owner
        )
    }

    fn redact(&self, text: &str) -> String {
        let token = &self.api.settings().token;
        if token.is_empty() {
            text.to_string()
        } else {
            text.replace(token.as_str(), REDACTED)
        }
    }

    async fn git(&self, dir: &Path, step: &str, args: &[&str]) -> Result<(), PublishError> {
        tracing::debug!(step, "Running git");

        let output = self
            .runner
            .run("git", args, dir)
            .await
            .map_err(|e| PublishError::Git {
                step: step.to_string(),
                detail: self.redact(&e.to_string()),
            })?;

        if output.success {
            return Ok(());
        }

        let code = output
            .code
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        Err(PublishError::Git {
            step: step.to_string(),
            detail: self.redact(&format!("exit {code}: {}", output.stderr)),
        })
    }

    async fn run_sequence(
        &self,
        dir: &Path,
        repo: &str,
        bundle: &SiteBundle,
    ) -> Result<String, PublishError> {
        let owner = self.api.settings().owner.as_str();

        self.git(dir, "init", &["init", "-b", BRANCH]).await?;
        self.git(dir, "config", &["config", "user.email", self.email.as_str()])
            .await?;
        self.git(dir, "config", &["config", "user.name", owner]).await?;

        write_bundle(dir, bundle).await?;

        self.git(dir, "add", &["add", "."]).await?;
        self.git(dir, "commit", &["commit", "-m", "init"]).await?;

        self.api.ensure_repo_public(repo).await?;
        self.api.ensure_pages_enabled(repo).await?;

        let remote = self.remote_url(repo);
        self.git(dir, "remote", &["remote", "add", "origin", remote.as_str()])
            .await?;
        self.git(dir, "push", &["push", "--force", "-u", "origin", BRANCH])
            .await?;

        Ok(self.api.latest_commit_sha(repo, BRANCH).await?)
    }
}

impl<H: HttpClient, R: CommandRunner> Publisher for GitPublisher<H, R> {
    async fn publish(&self, repo: &str, bundle: &SiteBundle) -> Result<PublishedSite, PublishError> {
        let workdir = tempfile::Builder::new().prefix("pagesmith-").tempdir()?;
        tracing::info!(repo, files = bundle.files().len(), "Publishing site");

        let commit_sha = self.run_sequence(workdir.path(), repo, bundle).await?;

        tracing::info!(repo, commit = %commit_sha, "Pushed site");
        Ok(PublishedSite {
            repo: repo.to_string(),
            commit_sha,
            repo_url: self.repo_url(repo),
            pages_url: self.pages_url(repo),
        })
    }
}

async fn write_bundle(root: &Path, bundle: &SiteBundle) -> Result<(), PublishError> {
    for file in bundle.files() {
        let path = resolve_in(root, &file.path)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &file.contents).await?;
    }
    Ok(())
}

/// Joins a bundle path onto `root`, rejecting anything but plain segments.
fn resolve_in(root: &Path, relative: &str) -> Result<PathBuf, PublishError> {
    let rel = Path::new(relative);
    let plain = rel
        .components()
        .all(|c| matches!(c, Component::Normal(_)));

    if relative.is_empty() || !plain {
        return Err(PublishError::UnsafePath(relative.to_string()));
    }
    Ok(root.join(rel))
}
