//! Webhook layer for sending HTTP requests to external services.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Budgeted callback delivery ([`HttpNotifier`], [`Notify`])
//! - Backoff configuration ([`BackoffPolicy`], [`Budget`])
//! - Inline-then-background delivery ([`Dispatcher`])

mod backoff;
mod client;
mod dispatch;
mod error;
mod http;
mod notifier;

#[cfg(test)]
pub(crate) mod test_fixtures;

#[cfg(test)]
mod client_tests;

pub use backoff::{BackoffPolicy, Budget};
pub use client::ReqwestClient;
pub use dispatch::{Dispatch, Dispatcher};
pub use error::{AttemptFailure, HttpError};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use notifier::{DeliveryOutcome, HttpNotifier, Notify, RETRYABLE_STATUSES, is_retryable_status};
