//! Application state shared across all handlers.

use std::sync::Arc;

use agenthub_core::config::AppConfig;
use agenthub_plugin::PluginManager;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Plugin manager
    pub plugins: Arc<PluginManager>,
}

impl AppState {
    /// Creates application state from its components.
    pub fn new(config: Arc<AppConfig>, plugins: Arc<PluginManager>) -> Self {
        Self { config, plugins }
    }
}
