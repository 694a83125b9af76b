//! Application execution logic.
//!
//! This module wires the configured components together and serves the
//! HTTP surface until a shutdown signal arrives.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;

use pagesmith::config::ValidatedConfig;
use pagesmith::github::{GitHubApi, GitPublisher};
use pagesmith::server::{AppState, ServerSettings, create_router};
use pagesmith::site::{LlmClient, PageGenerator, PageRenderer, SiteError};
use pagesmith::webhook::{Dispatcher, HttpNotifier, ReqwestClient};

/// State type used by the production server.
type AppStateImpl = AppState<GitPublisher<ReqwestClient>, HttpNotifier<ReqwestClient>, ReqwestClient>;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The built-in page templates failed to compile.
    #[error("Failed to load page templates: {0}")]
    Templates(#[source] SiteError),

    /// The listen socket could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address from the configuration
        addr: SocketAddr,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Serves the task endpoint until Ctrl+C or SIGTERM.
///
/// Background notifications still pending at shutdown are dropped.
///
/// # Errors
///
/// Returns an error if:
/// - The page templates fail to load
/// - The listen address cannot be bound
/// - The server fails while accepting connections
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| RunError::Bind {
            addr: config.bind,
            source,
        })?;
    tracing::info!("Listening on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(RunError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Builds the handler state from validated configuration.
///
/// One reqwest client is shared by the notifier, the GitHub API client
/// and the LLM client.
fn build_state(config: &ValidatedConfig) -> Result<AppStateImpl, RunError> {
    let client = ReqwestClient::new();

    let notifier = HttpNotifier::new(client.clone()).with_policy(config.backoff.clone());
    let dispatcher = Dispatcher::new(notifier)
        .with_budgets(config.inline_budget, config.background_budget);

    let api = GitHubApi::new(client.clone(), config.github.clone());
    let publisher = GitPublisher::new(api, config.git_email.clone());

    let llm = config.llm.clone().map(|settings| {
        tracing::info!(model = %settings.model, "LLM page generation enabled");
        LlmClient::new(client.clone(), settings)
    });
    let renderer = PageRenderer::new().map_err(RunError::Templates)?;
    let generator = PageGenerator::new(renderer, llm);

    let settings = ServerSettings {
        shared_secret: config.shared_secret.clone(),
        license_owner: config.github.owner.clone(),
    };

    Ok(AppState::new(settings, publisher, dispatcher, generator))
}

/// Waits for Ctrl+C or, on Unix, SIGTERM.
///
/// Excluded from coverage - requires signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("Shutdown signal received, stopping...");
}
