//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default listen address for the HTTP server.
pub const BIND: &str = "0.0.0.0:8000";

/// Default GitHub REST API root.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Default timeout for GitHub REST calls in seconds.
pub const GITHUB_TIMEOUT_SECS: u64 = 30;

/// Default model for LLM page generation.
pub const LLM_MODEL: &str = "gpt-4o-mini";

/// Default timeout for the LLM completion call in seconds.
pub const LLM_TIMEOUT_SECS: u64 = 120;

/// Default inline notification budget in seconds.
pub const NOTIFY_INLINE_BUDGET_SECS: u64 = 5;

/// Default background notification budget in seconds.
pub const NOTIFY_BACKGROUND_BUDGET_SECS: u64 = 600;

/// Default delay before the first notification retry in seconds.
pub const NOTIFY_FIRST_DELAY_SECS: u64 = 1;

/// Default ceiling for the notification retry delay in seconds.
pub const NOTIFY_MAX_DELAY_SECS: u64 = 60;

/// Default notification backoff multiplier.
pub const NOTIFY_MULTIPLIER: f64 = 2.0;

/// Default jitter bound in milliseconds.
pub const NOTIFY_MAX_JITTER_MS: u64 = 500;

/// Default timeout for one notification attempt in seconds.
pub const NOTIFY_ATTEMPT_TIMEOUT_SECS: u64 = 10;

/// Default GitHub REST timeout as Duration.
#[must_use]
pub const fn github_timeout() -> Duration {
    Duration::from_secs(GITHUB_TIMEOUT_SECS)
}

/// Default LLM timeout as Duration.
#[must_use]
pub const fn llm_timeout() -> Duration {
    Duration::from_secs(LLM_TIMEOUT_SECS)
}
