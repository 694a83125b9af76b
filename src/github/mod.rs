//! Publishing generated sites to GitHub.
//!
//! This module provides:
//! - A REST client for repository and Pages setup ([`GitHubApi`])
//! - External command execution ([`CommandRunner`])
//! - The commit-and-push sequence ([`GitPublisher`], [`Publisher`])

mod api;
mod error;
mod publisher;
mod runner;

#[cfg(test)]
mod publisher_tests;

pub use api::{GitHubApi, GitHubSettings};
pub use error::{GitHubError, PublishError};
pub use publisher::{GitPublisher, PublishedSite, Publisher};
pub use runner::{CommandOutput, CommandRunner, TokioCommandRunner};
