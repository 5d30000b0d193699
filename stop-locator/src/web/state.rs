//! Application state for the web layer.

use std::sync::Arc;

use crate::locate::StopLocator;

/// Shared application state.
///
/// Contains the locator every request goes through.
pub struct AppState<G, S> {
    /// Geocoder, stop store and search configuration
    pub locator: Arc<StopLocator<G, S>>,
}

impl<G, S> AppState<G, S> {
    /// Create a new app state.
    pub fn new(locator: StopLocator<G, S>) -> Self {
        Self {
            locator: Arc::new(locator),
        }
    }
}

impl<G, S> Clone for AppState<G, S> {
    fn clone(&self) -> Self {
        Self {
            locator: Arc::clone(&self.locator),
        }
    }
}
