//! Shared application state for the axum router.

use std::sync::Arc;

use crate::github::Publisher;
use crate::site::PageGenerator;
use crate::webhook::Dispatcher;

/// Request-independent settings used by the handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Secret every task request must carry.
    pub shared_secret: String,
    /// Copyright holder written into generated LICENSE files.
    pub license_owner: String,
}

/// State shared by every handler through axum's `State` extractor.
///
/// Generic over the publisher (`P`), the notifier behind the dispatcher
/// (`N`) and the HTTP client used for model-generated pages (`H`), so
/// tests can swap each one out.
#[derive(Debug)]
pub struct AppState<P, N, H> {
    pub(crate) settings: Arc<ServerSettings>,
    pub(crate) publisher: Arc<P>,
    pub(crate) dispatcher: Dispatcher<N>,
    pub(crate) generator: Arc<PageGenerator<H>>,
}

impl<P, N, H> Clone for AppState<P, N, H> {
    fn clone(&self) -> Self {
        Self {
            settings: Arc::clone(&self.settings),
            publisher: Arc::clone(&self.publisher),
            dispatcher: self.dispatcher.clone(),
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<P: Publisher, N, H> AppState<P, N, H> {
    /// Bundles the handler dependencies.
    #[must_use]
    pub fn new(
        settings: ServerSettings,
        publisher: P,
        dispatcher: Dispatcher<N>,
        generator: PageGenerator<H>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            publisher: Arc::new(publisher),
            dispatcher,
            generator: Arc::new(generator),
        }
    }

    /// Returns the handler settings.
    #[must_use]
    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }
}
