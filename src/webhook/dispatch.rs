//! Two-phase notification: a short inline attempt, then a detached retry.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::{Budget, DeliveryOutcome, Notify};

/// What happened to a dispatched notification by the time the caller resumes.
#[derive(Debug)]
pub enum Dispatch {
    /// The inline attempt was confirmed with status 200.
    Delivered,

    /// The inline attempt failed and a long-budget retry is running in the
    /// background.
    ///
    /// Dropping the handle detaches the task; awaiting it yields the
    /// background outcome.
    Deferred(JoinHandle<DeliveryOutcome>),
}

impl Dispatch {
    /// Returns true if the inline attempt delivered the notification.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Runs a notifier twice under different budgets.
///
/// The short budget runs inside the caller's request so its result can be
/// reported synchronously. If it does not deliver, a second invocation with
/// the long budget is spawned on the tokio runtime. That invocation starts
/// over with a fresh deadline and the budget's first delay.
#[derive(Debug)]
pub struct Dispatcher<N> {
    notifier: Arc<N>,
    inline: Budget,
    background: Budget,
}

impl<N> Clone for Dispatcher<N> {
    fn clone(&self) -> Self {
        Self {
            notifier: Arc::clone(&self.notifier),
            inline: self.inline,
            background: self.background,
        }
    }
}

impl<N: Notify + 'static> Dispatcher<N> {
    /// Creates a dispatcher with [`Budget::SHORT`] inline and
    /// [`Budget::LONG`] in the background.
    #[must_use]
    pub fn new(notifier: N) -> Self {
        Self {
            notifier: Arc::new(notifier),
            inline: Budget::SHORT,
            background: Budget::LONG,
        }
    }

    /// Sets the inline and background budgets.
    #[must_use]
    pub const fn with_budgets(mut self, inline: Budget, background: Budget) -> Self {
        self.inline = inline;
        self.background = background;
        self
    }

    /// Returns the inline budget.
    #[must_use]
    pub const fn inline_budget(&self) -> Budget {
        self.inline
    }

    /// Returns the background budget.
    #[must_use]
    pub const fn background_budget(&self) -> Budget {
        self.background
    }

    /// Delivers `payload` to `url`, deferring to a background task on failure.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn dispatch(&self, url: url::Url, payload: serde_json::Value) -> Dispatch {
        let outcome = self.notifier.notify(&url, &payload, self.inline).await;
        if outcome.is_delivered() {
            return Dispatch::Delivered;
        }

        tracing::info!(
            %url,
            attempts = outcome.attempts(),
            budget_secs = self.background.max_elapsed.as_secs(),
            "Inline notification failed, retrying in background"
        );

        let notifier = Arc::clone(&self.notifier);
        let budget = self.background;
        let handle = tokio::spawn(async move {
            let outcome = notifier.notify(&url, &payload, budget).await;
            log_background_outcome(&url, &outcome);
            outcome
        });

        Dispatch::Deferred(handle)
    }
}

fn log_background_outcome(url: &url::Url, outcome: &DeliveryOutcome) {
    match outcome {
        DeliveryOutcome::Delivered { attempts } => {
            tracing::info!(%url, attempts, "Background notification delivered");
        }
        DeliveryOutcome::Rejected { status, attempts } => {
            tracing::warn!(%url, %status, attempts, "Background notification rejected");
        }
        DeliveryOutcome::Exhausted {
            attempts,
            last_failure,
        } => {
            let last = last_failure
                .as_ref()
                .map_or_else(|| "none".to_string(), ToString::to_string);
            tracing::error!(%url, attempts, last_failure = %last, "Background notification gave up");
        }
    }
}
