//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{BackendClient, BackendError};
use crate::config::AdminConfig;

/// Application state shared across all handlers.
///
/// Cheap to clone; clones share the same configuration and backend client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    backend: BackendClient,
}

impl AppState {
    /// Build the state, creating the backend client from `config.backend`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: AdminConfig) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config.backend)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, backend }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }
}
