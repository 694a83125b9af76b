//! Callback notifier with time-budgeted exponential backoff.

use crate::time::{Clock, MonotonicClock, Sleeper, TokioSleeper};

use super::{AttemptFailure, BackoffPolicy, Budget, HttpClient, HttpRequest};

/// Result of one notifier invocation.
///
/// Only [`DeliveryOutcome::Delivered`] counts as success; the other variants
/// keep the reason apart for logging.
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// The callback answered 200 before the deadline.
    Delivered {
        /// Number of attempts made, including the successful one.
        attempts: u32,
    },

    /// The callback answered with a status that is not worth retrying.
    Rejected {
        /// The non-retryable status.
        status: http::StatusCode,
        /// Number of attempts made.
        attempts: u32,
    },

    /// The budget ran out while the failures were still retryable.
    Exhausted {
        /// Number of attempts made (zero when the budget was already empty).
        attempts: u32,
        /// The last failure observed, if any attempt was made.
        last_failure: Option<AttemptFailure>,
    },
}

impl DeliveryOutcome {
    /// Returns true if the callback confirmed delivery with status 200.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// Returns the number of attempts made.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Delivered { attempts }
            | Self::Rejected { attempts, .. }
            | Self::Exhausted { attempts, .. } => *attempts,
        }
    }
}

/// Trait for delivering a JSON payload to a callback URL within a budget.
///
/// This is the seam the [`Dispatcher`](super::Dispatcher) drives, so it can
/// be exercised with a fake in tests.
pub trait Notify: Send + Sync {
    /// Delivers `payload` to `url`, retrying until `budget` is spent.
    ///
    /// Never fails; the outcome describes what happened.
    fn notify(
        &self,
        url: &url::Url,
        payload: &serde_json::Value,
        budget: Budget,
    ) -> impl std::future::Future<Output = DeliveryOutcome> + Send;
}

/// HTTP notifier posting JSON with exponential backoff and jitter.
///
/// Each invocation owns its deadline and delay; nothing is shared between
/// concurrent invocations except the immutable policy.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper used between attempts (defaults to [`TokioSleeper`])
/// - `C`: The clock the deadline is measured on (defaults to [`MonotonicClock`])
///
/// # Example
///
/// ```
/// use pagesmith::webhook::{BackoffPolicy, HttpNotifier, ReqwestClient};
///
/// let notifier = HttpNotifier::new(ReqwestClient::new())
///     .with_policy(BackoffPolicy::default());
/// assert_eq!(notifier.policy().max_delay.as_secs(), 60);
/// ```
#[derive(Debug)]
pub struct HttpNotifier<H, S = TokioSleeper, C = MonotonicClock> {
    client: H,
    sleeper: S,
    clock: C,
    policy: BackoffPolicy,
}

impl<H> HttpNotifier<H, TokioSleeper, MonotonicClock> {
    /// Creates a notifier with the default policy, tokio sleeps and the
    /// monotonic clock.
    #[must_use]
    pub fn new(client: H) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            clock: MonotonicClock,
            policy: BackoffPolicy::default(),
        }
    }
}

impl<H, S, C> HttpNotifier<H, S, C> {
    /// Sets a custom sleeper for retry delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> HttpNotifier<H, S2, C> {
        HttpNotifier {
            client: self.client,
            sleeper,
            clock: self.clock,
            policy: self.policy,
        }
    }

    /// Sets a custom clock for deadline checks.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> HttpNotifier<H, S, C2> {
        HttpNotifier {
            client: self.client,
            sleeper: self.sleeper,
            clock,
            policy: self.policy,
        }
    }

    /// Sets the backoff policy.
    #[must_use]
    pub fn with_policy(mut self, policy: BackoffPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the configured backoff policy.
    #[must_use]
    pub const fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }
}

impl<H: HttpClient, S: Sleeper, C: Clock> HttpNotifier<H, S, C> {
    fn build_request(&self, url: &url::Url, payload: &serde_json::Value) -> HttpRequest {
        HttpRequest::post(url.clone())
            .with_json(payload)
            .with_timeout(self.policy.attempt_timeout)
    }

    /// Executes a single delivery attempt.
    async fn attempt(&self, request: &HttpRequest) -> Result<(), AttemptFailure> {
        let response = self.client.request(request.clone()).await?;

        if response.status == http::StatusCode::OK {
            return Ok(());
        }

        Err(AttemptFailure::Status {
            status: response.status,
            body: response.body_text().map(ToString::to_string),
        })
    }

    async fn notify_with_backoff(
        &self,
        url: &url::Url,
        payload: &serde_json::Value,
        budget: Budget,
    ) -> DeliveryOutcome {
        let request = self.build_request(url, payload);
        let deadline = self.clock.now() + budget.max_elapsed;
        let mut delay = budget.first_delay;
        let mut attempts = 0;
        let mut last_failure = None;

        while self.clock.now() < deadline {
            attempts += 1;
            match self.attempt(&request).await {
                Ok(()) => {
                    tracing::debug!(%url, attempts, "Notification delivered");
                    return DeliveryOutcome::Delivered { attempts };
                }
                Err(AttemptFailure::Status { status, body }) if !is_retryable_status(status) => {
                    tracing::warn!(
                        %url,
                        %status,
                        body = body.as_deref().unwrap_or(""),
                        "Notification rejected"
                    );
                    return DeliveryOutcome::Rejected { status, attempts };
                }
                Err(failure) => {
                    tracing::debug!(%url, attempts, error = %failure, "Notification attempt failed");
                    last_failure = Some(failure);
                }
            }

            // No attempt can follow a pause that reaches the deadline.
            let remaining = deadline.saturating_duration_since(self.clock.now());
            let pause = self.policy.jittered(delay, &mut rand::thread_rng());
            if pause >= remaining {
                break;
            }
            self.sleeper.sleep(pause).await;
            delay = self.policy.next_delay(delay);
        }

        DeliveryOutcome::Exhausted {
            attempts,
            last_failure,
        }
    }
}

impl<H: HttpClient, S: Sleeper, C: Clock> Notify for HttpNotifier<H, S, C> {
    async fn notify(
        &self,
        url: &url::Url,
        payload: &serde_json::Value,
        budget: Budget,
    ) -> DeliveryOutcome {
        self.notify_with_backoff(url, payload, budget).await
    }
}

impl<T: Notify> Notify for std::sync::Arc<T> {
    fn notify(
        &self,
        url: &url::Url,
        payload: &serde_json::Value,
        budget: Budget,
    ) -> impl std::future::Future<Output = DeliveryOutcome> + Send {
        (**self).notify(url, payload, budget)
    }
}

/// Statuses that signal a transient condition on the callback side.
pub const RETRYABLE_STATUSES: [http::StatusCode; 5] = [
    http::StatusCode::TOO_MANY_REQUESTS,
    http::StatusCode::INTERNAL_SERVER_ERROR,
    http::StatusCode::BAD_GATEWAY,
    http::StatusCode::SERVICE_UNAVAILABLE,
    http::StatusCode::GATEWAY_TIMEOUT,
];

/// Returns true if a callback status warrants another attempt.
#[must_use]
pub fn is_retryable_status(status: http::StatusCode) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}
