//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::github::GitHubSettings;
use crate::site::LlmSettings;
use crate::webhook::{BackoffPolicy, Budget};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::{NotifySection, TomlConfig};

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Listen address for the HTTP server
    pub bind: SocketAddr,

    /// Secret every task request must carry
    pub shared_secret: String,

    /// GitHub account and REST settings
    pub github: GitHubSettings,

    /// Email used for git commits
    pub git_email: String,

    /// LLM settings; `None` disables model-generated pages
    pub llm: Option<LlmSettings>,

    /// Backoff shared by every notification attempt
    pub backoff: BackoffPolicy,

    /// Budget for the attempt made while the request waits
    pub inline_budget: Budget,

    /// Budget for the detached retry
    pub background_budget: Budget,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let llm = self.llm.as_ref().map_or_else(
            || "disabled".to_string(),
            |l| format!("{} @ {}", l.model, l.endpoint),
        );

        write!(
            f,
            "Config {{ bind: {}, github: {} @ {}, llm: {}, notify: {}s inline / {}s background, \
             first_delay: {}s, max_delay: {}s }}",
            self.bind,
            self.github.owner,
            self.github.api_base,
            llm,
            self.inline_budget.max_elapsed.as_secs(),
            self.background_budget.max_elapsed.as_secs(),
            self.inline_budget.first_delay.as_secs(),
            self.backoff.max_delay.as_secs(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments (and their environment variables) take precedence over
    /// TOML config values, which take precedence over built-in defaults.
    /// Empty strings count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A required credential is missing
    /// - The bind address or a URL is invalid
    /// - A timeout or budget is zero
    /// - The backoff settings are inconsistent
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let bind = Self::resolve_bind(cli, toml)?;

        let shared_secret = required(
            cli.shared_secret.as_deref(),
            toml.and_then(|t| t.server.shared_secret.as_deref()),
            field::SHARED_SECRET,
            "Use --shared-secret, SHARED_SECRET or set server.shared_secret in config file",
        )?;

        let github = Self::resolve_github(cli, toml)?;

        let git_email = required(
            cli.github_email.as_deref(),
            toml.and_then(|t| t.github.email.as_deref()),
            field::GITHUB_EMAIL,
            "Use --github-email, GITHUB_EMAIL or set github.email in config file",
        )?;

        let llm = Self::resolve_llm(cli, toml)?;

        let default_notify = NotifySection::default();
        let notify = toml.map_or(&default_notify, |t| &t.notify);
        let (inline_budget, background_budget) = build_budgets(notify)?;
        let backoff = build_backoff(notify, inline_budget.first_delay)?;

        Ok(Self {
            bind,
            shared_secret,
            github,
            git_email,
            llm,
            backoff,
            inline_budget,
            background_budget,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_bind(cli: &Cli, toml: Option<&TomlConfig>) -> Result<SocketAddr, ConfigError> {
        let value = first_set(
            cli.bind.as_deref(),
            toml.and_then(|t| t.server.bind.as_deref()),
        )
        .unwrap_or(defaults::BIND);

        value.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidBind {
            value: value.to_string(),
            reason: e.to_string(),
        })
    }

    fn resolve_github(cli: &Cli, toml: Option<&TomlConfig>) -> Result<GitHubSettings, ConfigError> {
        let section = toml.map(|t| &t.github);

        let owner = required(
            cli.github_username.as_deref(),
            section.and_then(|s| s.username.as_deref()),
            field::GITHUB_USERNAME,
            "Use --github-username, GITHUB_USERNAME or set github.username in config file",
        )?;

        let token = required(
            cli.github_token.as_deref(),
            section.and_then(|s| s.token.as_deref()),
            field::GITHUB_TOKEN,
            "Use --github-token, GITHUB_PAT or set github.token in config file",
        )?;

        let api_base = parse_url(
            section
                .and_then(|s| s.api_base.as_deref())
                .unwrap_or(defaults::GITHUB_API_BASE),
        )?;

        let timeout = positive_secs(
            "github.timeout",
            section
                .and_then(|s| s.timeout)
                .unwrap_or(defaults::GITHUB_TIMEOUT_SECS),
        )?;

        Ok(GitHubSettings {
            api_base,
            owner,
            token,
            timeout,
        })
    }

    fn resolve_llm(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Option<LlmSettings>, ConfigError> {
        let section = toml.map(|t| &t.llm);

        let Some(endpoint) = first_set(
            cli.llm_endpoint.as_deref(),
            section.and_then(|s| s.endpoint.as_deref()),
        ) else {
            return Ok(None);
        };
        let endpoint = parse_url(endpoint)?;

        let api_key = required(
            cli.llm_api_key.as_deref(),
            section.and_then(|s| s.api_key.as_deref()),
            field::LLM_API_KEY,
            "Use --llm-api-key, LLM_API_KEY or set llm.api_key in config file",
        )?;

        let model = first_set(
            cli.llm_model.as_deref(),
            section.and_then(|s| s.model.as_deref()),
        )
        .unwrap_or(defaults::LLM_MODEL)
        .to_string();

        let timeout = positive_secs(
            "llm.timeout",
            section
                .and_then(|s| s.timeout)
                .unwrap_or(defaults::LLM_TIMEOUT_SECS),
        )?;

        Ok(Some(LlmSettings {
            endpoint,
            api_key,
            model,
            timeout,
        }))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

/// Picks the CLI value, then the TOML value, skipping empty strings.
fn first_set<'a>(cli: Option<&'a str>, toml: Option<&'a str>) -> Option<&'a str> {
    cli.filter(|v| !v.is_empty())
        .or_else(|| toml.filter(|v| !v.is_empty()))
}

fn required(
    cli: Option<&str>,
    toml: Option<&str>,
    field: &'static str,
    hint: &'static str,
) -> Result<String, ConfigError> {
    first_set(cli, toml)
        .map(ToString::to_string)
        .ok_or_else(|| ConfigError::missing(field, hint))
}

fn parse_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        url: value.to_string(),
        reason: e.to_string(),
    })
}

fn positive_secs(field: &'static str, seconds: u64) -> Result<Duration, ConfigError> {
    if seconds == 0 {
        return Err(ConfigError::InvalidDuration {
            field,
            reason: "must be greater than 0".to_string(),
        });
    }
    Ok(Duration::from_secs(seconds))
}

fn build_budgets(notify: &NotifySection) -> Result<(Budget, Budget), ConfigError> {
    let inline = positive_secs(
        "notify.inline_budget",
        notify
            .inline_budget
            .unwrap_or(defaults::NOTIFY_INLINE_BUDGET_SECS),
    )?;
    let background = positive_secs(
        "notify.background_budget",
        notify
            .background_budget
            .unwrap_or(defaults::NOTIFY_BACKGROUND_BUDGET_SECS),
    )?;

    let first_delay_secs = notify
        .first_delay
        .unwrap_or(defaults::NOTIFY_FIRST_DELAY_SECS);
    if first_delay_secs == 0 {
        return Err(ConfigError::InvalidBackoff(
            "first_delay must be greater than 0".to_string(),
        ));
    }
    let first_delay = Duration::from_secs(first_delay_secs);

    Ok((
        Budget::new(inline, first_delay),
        Budget::new(background, first_delay),
    ))
}

fn build_backoff(notify: &NotifySection, first_delay: Duration) -> Result<BackoffPolicy, ConfigError> {
    let max_delay_secs = notify.max_delay.unwrap_or(defaults::NOTIFY_MAX_DELAY_SECS);
    let multiplier = notify.multiplier.unwrap_or(defaults::NOTIFY_MULTIPLIER);
    let max_jitter_ms = notify
        .max_jitter_ms
        .unwrap_or(defaults::NOTIFY_MAX_JITTER_MS);
    let attempt_timeout = positive_secs(
        "notify.attempt_timeout",
        notify
            .attempt_timeout
            .unwrap_or(defaults::NOTIFY_ATTEMPT_TIMEOUT_SECS),
    )?;

    if multiplier <= 0.0 || !multiplier.is_finite() {
        return Err(ConfigError::InvalidBackoff(
            "multiplier must be a positive finite number".to_string(),
        ));
    }

    let first_delay_secs = first_delay.as_secs();
    if max_delay_secs < first_delay_secs {
        return Err(ConfigError::InvalidBackoff(format!(
            "max_delay ({max_delay_secs}s) must be >= first_delay ({first_delay_secs}s)"
        )));
    }

    Ok(BackoffPolicy::new()
        .with_max_delay(Duration::from_secs(max_delay_secs))
        .with_multiplier(multiplier)
        .with_max_jitter(Duration::from_millis(max_jitter_ms))
        .with_attempt_timeout(attempt_timeout))
}
