//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// HTTP server section
    #[serde(default)]
    pub server: ServerSection,

    /// GitHub account section
    #[serde(default)]
    pub github: GitHubSection,

    /// Optional LLM page generation section
    #[serde(default)]
    pub llm: LlmSection,

    /// Evaluation callback retry section
    #[serde(default)]
    pub notify: NotifySection,
}

/// HTTP server section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Listen address, e.g. `0.0.0.0:8000`
    pub bind: Option<String>,

    /// Secret every task request must carry
    pub shared_secret: Option<String>,
}

/// GitHub account section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitHubSection {
    /// Account owning the generated repositories
    pub username: Option<String>,

    /// Email used for git commits
    pub email: Option<String>,

    /// Personal access token
    pub token: Option<String>,

    /// REST API root
    pub api_base: Option<String>,

    /// REST call timeout in seconds
    pub timeout: Option<u64>,
}

/// LLM section. Generation is enabled when `endpoint` is set.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmSection {
    /// Chat completions URL
    pub endpoint: Option<String>,

    /// Bearer token for the endpoint
    pub api_key: Option<String>,

    /// Model name
    pub model: Option<String>,

    /// Completion timeout in seconds
    pub timeout: Option<u64>,
}

/// Evaluation callback retry section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifySection {
    /// Inline budget in seconds
    pub inline_budget: Option<u64>,

    /// Background budget in seconds
    pub background_budget: Option<u64>,

    /// Delay before the first retry in seconds
    pub first_delay: Option<u64>,

    /// Ceiling for the retry delay in seconds
    pub max_delay: Option<u64>,

    /// Backoff multiplier
    pub multiplier: Option<f64>,

    /// Exclusive jitter bound in milliseconds (0 disables jitter)
    pub max_jitter_ms: Option<u64>,

    /// Timeout for one attempt in seconds
    pub attempt_timeout: Option<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Pagesmith Configuration File
#
# Secrets may be left out here and supplied through the environment:
# GITHUB_USERNAME, GITHUB_EMAIL, GITHUB_PAT, SHARED_SECRET,
# LLM_ENDPOINT, LLM_API_KEY, LLM_MODEL

[server]
# Listen address (default: 0.0.0.0:8000)
bind = "0.0.0.0:8000"

# Secret every task request must carry (required)
# shared_secret = "change-me"

[github]
# Account owning the generated repositories (required)
# username = "octocat"

# Email used for git commits (required)
# email = "octocat@users.noreply.github.com"

# Personal access token with repo and pages scope (required)
# token = "ghp_..."

# REST API root (default: https://api.github.com)
# api_base = "https://api.github.com"

# REST call timeout in seconds (default: 30)
# timeout = 30

[llm]
# OpenAI-compatible chat completions URL; leave unset to use templates only
# endpoint = "https://api.openai.com/v1/chat/completions"
# api_key = "sk-..."

# Model name (default: gpt-4o-mini)
# model = "gpt-4o-mini"

# Completion timeout in seconds (default: 120)
# timeout = 120

[notify]
# Inline attempt budget in seconds, spent while the request waits (default: 5)
# inline_budget = 5

# Background retry budget in seconds (default: 600)
# background_budget = 600

# Delay before the first retry in seconds (default: 1)
# first_delay = 1

# Maximum retry delay in seconds (default: 60)
# max_delay = 60

# Backoff multiplier (default: 2.0)
# multiplier = 2.0

# Random jitter bound in milliseconds, 0 disables (default: 500)
# max_jitter_ms = 500

# Timeout for one callback attempt in seconds (default: 10)
# attempt_timeout = 10
"#
    .to_string()
}
