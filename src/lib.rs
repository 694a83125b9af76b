//! Pagesmith: task-to-GitHub-Pages publisher
//!
//! A library for turning task requests into static sites on GitHub Pages
//! and reporting the result to an evaluation callback with budgeted,
//! jittered retries.

pub mod config;
pub mod github;
pub mod server;
pub mod site;
pub mod time;
pub mod webhook;
