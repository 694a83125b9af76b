//! Backoff policy and time budgets for notification delivery.

use std::time::Duration;

use rand::Rng;

/// Wall-clock budget for one notifier invocation.
///
/// The budget is soft: the last attempt may start just before the deadline
/// and run for up to one attempt timeout past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    /// Total time allowed, measured from the start of the invocation.
    pub max_elapsed: Duration,

    /// Delay before the first retry.
    pub first_delay: Duration,
}

impl Budget {
    /// Budget used inline while the request handler is still answering.
    pub const SHORT: Self = Self::new(Duration::from_secs(5), Duration::from_secs(1));

    /// Budget used by the detached background retry.
    pub const LONG: Self = Self::new(Duration::from_secs(600), Duration::from_secs(1));

    /// Creates a budget.
    #[must_use]
    pub const fn new(max_elapsed: Duration, first_delay: Duration) -> Self {
        Self {
            max_elapsed,
            first_delay,
        }
    }
}

/// Exponential backoff with jitter, shared by every notifier invocation.
///
/// Per-invocation state (deadline, current delay) lives in the notifier
/// loop, not here, so two invocations never influence each other.
///
/// # Defaults
///
/// - `max_delay`: 60 seconds
/// - `multiplier`: 2.0
/// - `max_jitter`: 500 milliseconds
/// - `attempt_timeout`: 10 seconds
///
/// # Example
///
/// ```
/// use pagesmith::webhook::BackoffPolicy;
/// use std::time::Duration;
///
/// let policy = BackoffPolicy::new().with_max_delay(Duration::from_secs(30));
/// assert_eq!(
///     policy.next_delay(Duration::from_secs(20)),
///     Duration::from_secs(30)
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Ceiling for the nominal delay between attempts.
    pub max_delay: Duration,

    /// Multiplier applied to the delay after each failed attempt.
    pub multiplier: f64,

    /// Exclusive upper bound of the random jitter added to each sleep.
    pub max_jitter: Duration,

    /// Timeout applied to each individual HTTP attempt.
    pub attempt_timeout: Duration,
}

impl BackoffPolicy {
    /// Default maximum delay (60 seconds).
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

    /// Default multiplier (2.0).
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;

    /// Default jitter bound (500 milliseconds).
    pub const DEFAULT_MAX_JITTER: Duration = Duration::from_millis(500);

    /// Default per-attempt timeout (10 seconds).
    pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_delay: Self::DEFAULT_MAX_DELAY,
            multiplier: Self::DEFAULT_MULTIPLIER,
            max_jitter: Self::DEFAULT_MAX_JITTER,
            attempt_timeout: Self::DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Sets the delay ceiling.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the delay multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `multiplier` is not positive (must be > 0.0).
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        assert!(multiplier > 0.0, "multiplier must be positive");
        self.multiplier = multiplier;
        self
    }

    /// Sets the jitter bound. Zero disables jitter.
    #[must_use]
    pub const fn with_max_jitter(mut self, jitter: Duration) -> Self {
        self.max_jitter = jitter;
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub const fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Computes the nominal delay that follows `current`, capped at `max_delay`.
    #[must_use]
    pub fn next_delay(&self, current: Duration) -> Duration {
        let grown = current.as_secs_f64() * self.multiplier;
        let capped = grown.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped)
    }

    /// Adds uniform jitter in `[0, max_jitter)` to a nominal delay.
    #[must_use]
    pub fn jittered<R: Rng + ?Sized>(&self, delay: Duration, rng: &mut R) -> Duration {
        if self.max_jitter.is_zero() {
            return delay;
        }
        let jitter = rng.gen_range(Duration::ZERO..self.max_jitter);
        delay + jitter
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new()
    }
}
