//! Static site generation for a task.
//!
//! This module provides:
//! - Attachment decoding from `data:` URLs ([`Attachments`])
//! - Keyword-selected page templates ([`PageKind`], [`PageRenderer`])
//! - Optional model-generated pages ([`LlmClient`])
//! - Page source selection ([`PageGenerator`])
//! - Repository naming ([`repo_name`]) and contents ([`SiteBundle`])

mod attachments;
mod bundle;
mod error;
mod generator;
mod llm;
mod naming;
mod pages;

pub use attachments::{Attachment, Attachments};
pub use bundle::{BundleSpec, SiteBundle, SiteFile};
pub use error::{LlmError, SiteError};
pub use generator::{GeneratedPage, PageGenerator, PageSource, seed_from_email};
pub use llm::{LlmClient, LlmSettings};
pub use naming::{MAX_TASK_LEN, REPO_PREFIX, repo_name};
pub use pages::{PageKind, PageRenderer};
