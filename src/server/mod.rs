//! HTTP surface: task intake and health check.
//!
//! This module provides:
//! - The axum router ([`create_router`])
//! - Shared handler state ([`AppState`], [`ServerSettings`])
//! - Request validation and the callback payload ([`TaskRequest`], [`NotificationPayload`])
//! - JSON error responses ([`ApiError`])

mod error;
mod routes;
mod state;
mod task;

#[cfg(test)]
mod task_tests;

pub use error::ApiError;
pub use routes::{TASK_BODY_LIMIT, create_router};
pub use state::{AppState, ServerSettings};
pub use task::{NotificationPayload, TaskRequest};
