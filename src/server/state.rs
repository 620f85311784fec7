//! Shared application state for the API server

use crate::archive::TableSource;
use crate::config::FetchMode;
use std::sync::Arc;

/// Shared application state
///
/// Holds nothing mutable: every request builds its own session and header
/// profile inside the table source.
#[derive(Clone)]
pub struct AppState {
    /// Where `/nse` and `/test-connection` get their data
    pub source: Arc<dyn TableSource>,
}

impl AppState {
    /// Creates a new application state
    pub fn new(source: Arc<dyn TableSource>) -> Self {
        AppState { source }
    }

    pub fn mode(&self) -> FetchMode {
        self.source.mode()
    }
}
