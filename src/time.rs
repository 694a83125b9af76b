//! Time abstraction for testability.
//!
//! This module provides a [`Clock`] trait for reading monotonic time and a
//! [`Sleeper`] trait for suspending between retry attempts, so tests can
//! inject controlled time instead of waiting on the real clock.

use std::time::Duration;

use tokio::time::Instant;

/// Abstraction over monotonic time for testability.
///
/// Deadlines are computed against this clock. Implementations must never
/// go backwards.
///
/// # Example
///
/// ```
/// use pagesmith::time::{Clock, MonotonicClock};
///
/// let clock = MonotonicClock;
/// let first = clock.now();
/// assert!(clock.now() >= first);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Production clock backed by [`tokio::time::Instant`].
///
/// Honors tokio's paused time in tests (`start_paused = true`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Abstraction over async sleeping.
///
/// The sleep must not block the executor thread; other requests keep being
/// served while a notification backs off.
pub trait Sleeper: Send + Sync {
    /// Suspends the current task for `duration`.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production sleeper using [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
