//! Repository naming for generated sites.

use std::sync::LazyLock;

use regex::Regex;

/// Prefix shared by every generated repository.
pub const REPO_PREFIX: &str = "llm-task-";

/// Maximum length of the sanitized task part.
pub const MAX_TASK_LEN: usize = 80;

static UNSAFE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\-]+").expect("static pattern is valid"));

/// Turns a task identifier into a GitHub repository name.
///
/// Runs of characters outside `[A-Za-z0-9-]` become a single `-`, leading
/// and trailing dashes are trimmed, and the result is cut to
/// [`MAX_TASK_LEN`] characters before [`REPO_PREFIX`] is added.
#[must_use]
pub fn repo_name(task: &str) -> String {
    let replaced = UNSAFE_RUN.replace_all(task, "-");
    let trimmed = replaced.trim_matches('-');
    // Only ASCII survives the replacement, so byte slicing is safe.
    let cut = &trimmed[..trimmed.len().min(MAX_TASK_LEN)];
    format!("{REPO_PREFIX}{cut}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_safe_characters() {
        assert_eq!(repo_name("captcha-solver-42"), "llm-task-captcha-solver-42");
    }

    #[test]
    fn collapses_unsafe_runs() {
        assert_eq!(repo_name("sum of  sales/v2"), "llm-task-sum-of-sales-v2");
    }

    #[test]
    fn trims_edge_dashes() {
        assert_eq!(repo_name("  --hello world!! "), "llm-task-hello-world");
    }

    #[test]
    fn replaces_non_ascii() {
        assert_eq!(repo_name("café_ünïcode"), "llm-task-caf-n-code");
    }

    #[test]
    fn truncates_to_eighty_characters() {
        let name = repo_name(&"a".repeat(200));
        assert_eq!(name.len(), REPO_PREFIX.len() + MAX_TASK_LEN);
    }

    #[test]
    fn empty_task_is_just_prefix() {
        assert_eq!(repo_name("***"), "llm-task-");
    }
}
