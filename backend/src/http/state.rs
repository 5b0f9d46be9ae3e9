//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::SiteConfig;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Site configuration, read once at startup.
    pub config: Arc<SiteConfig>,
}

impl AppState {
    /// Create a new application state with the given configuration.
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
