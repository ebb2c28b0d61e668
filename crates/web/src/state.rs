//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::MyflixClient;
use crate::config::MyflixConfig;

/// Application state shared across all handlers.
///
/// Cheap to clone. Every handler shares one API client and therefore one
/// connection pool.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: MyflixConfig,
    api: MyflixClient,
}

impl AppState {
    /// Create the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: MyflixConfig) -> Result<Self, reqwest::Error> {
        let api = MyflixClient::new(&config.api)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &MyflixConfig {
        &self.inner.config
    }

    /// The myFlix API client. Handlers wrap it in their
    /// [`ViewScope`](crate::middleware::ViewScope) before use.
    #[must_use]
    pub fn api(&self) -> &MyflixClient {
        &self.inner.api
    }
}
