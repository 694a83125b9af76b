//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.
//! Credentials can also come from the environment.

use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

/// Pagesmith: task-to-GitHub-Pages publisher
///
/// Receives task requests over HTTP, publishes a generated static site to
/// GitHub Pages and reports the result to the caller's evaluation URL.
#[derive(Debug, Parser)]
#[command(name = "pagesmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Address the HTTP server listens on
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// GitHub account that owns the generated repositories
    #[arg(long = "github-username", env = "GITHUB_USERNAME")]
    pub github_username: Option<String>,

    /// Email used for git commits
    #[arg(long = "github-email", env = "GITHUB_EMAIL")]
    pub github_email: Option<String>,

    /// GitHub personal access token
    #[arg(long = "github-token", env = "GITHUB_PAT", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Secret every task request must carry
    #[arg(long = "shared-secret", env = "SHARED_SECRET", hide_env_values = true)]
    pub shared_secret: Option<String>,

    /// OpenAI-compatible chat completions URL (enables LLM pages)
    #[arg(long = "llm-endpoint", env = "LLM_ENDPOINT")]
    pub llm_endpoint: Option<String>,

    /// API key for the LLM endpoint
    #[arg(long = "llm-api-key", env = "LLM_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Model name for the LLM endpoint
    #[arg(long = "llm-model", env = "LLM_MODEL")]
    pub llm_model: Option<String>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for pagesmith
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "pagesmith.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator, ignoring environment variables.
    ///
    /// Only explicit arguments are considered, so the result does not depend
    /// on the caller's environment.
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown, missing or repeated arguments.
    pub fn try_parse_without_env<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = Self::command()
            .mut_args(|arg| arg.env(None::<&'static str>))
            .try_get_matches_from(iter)?;
        Self::from_arg_matches(&matches)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
