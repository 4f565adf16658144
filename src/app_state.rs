//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::persistence::TodoStore;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Persistence gateway, constructed once at startup.
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    /// Wraps a store for sharing across handlers.
    #[must_use]
    pub fn new(store: impl TodoStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
