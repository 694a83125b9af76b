//! Configuration layer for pagesmith.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values passed on the command line
//! 2. **Environment variables** - `GITHUB_USERNAME`, `GITHUB_EMAIL`, `GITHUB_PAT`,
//!    `SHARED_SECRET`, `LLM_ENDPOINT`, `LLM_API_KEY`, `LLM_MODEL`
//! 3. **TOML config file** - Values from the configuration file
//! 4. **Built-in defaults** - Hardcoded default values
//!
//! Empty strings at any level count as unset.
//!
//! # TOML-Only Options
//!
//! The notification backoff (`[notify]`), the GitHub API root and the
//! timeouts are only configurable through the config file.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
