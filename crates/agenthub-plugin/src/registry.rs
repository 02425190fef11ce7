//! Plugin registry — the single source of truth for plugin metadata and
//! lifecycle state.
//!
//! Pure data store: every state transition goes through
//! [`PluginRegistry::update_state`]; no business logic lives here.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::PluginError;
use crate::manifest::{Manifest, PluginType};

/// Lifecycle state of a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginState {
    /// Manifest found and registered; nothing loaded yet.
    Discovered,
    /// Modules loaded and components instantiated.
    Loaded,
    /// Capabilities registered with the host; hooks live.
    Enabled,
    /// Capabilities unregistered; components retained for re-enable.
    Disabled,
    /// A lifecycle operation failed; see the stored error message.
    Error,
}

impl PluginState {
    /// Returns the string name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Loaded => "loaded",
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for PluginState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable runtime record for one discovered plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Generated identifier.
    pub id: Uuid,
    /// The plugin's manifest.
    pub manifest: Manifest,
    /// Current lifecycle state.
    pub state: PluginState,
    /// When the plugin's modules were last loaded.
    pub loaded_at: Option<DateTime<Utc>>,
    /// Error message; present only while `state` is [`PluginState::Error`].
    pub error: Option<String>,
    /// The plugin's source directory.
    pub plugin_dir: PathBuf,
    /// Resolved configuration values.
    pub config: HashMap<String, Value>,
}

impl PluginInfo {
    /// Creates a record for a freshly discovered plugin.
    ///
    /// Declared config defaults are applied here, once; values already
    /// present are never overwritten.
    pub fn new(manifest: Manifest, plugin_dir: PathBuf) -> Self {
        let mut config = HashMap::new();
        for (key, field) in &manifest.config {
            if let Some(default) = &field.default {
                config.entry(key.clone()).or_insert_with(|| default.clone());
            }
        }
        Self {
            id: Uuid::new_v4(),
            manifest,
            state: PluginState::Discovered,
            loaded_at: None,
            error: None,
            plugin_dir,
            config,
        }
    }

    /// The plugin's unique name.
    pub fn name(&self) -> &str {
        &self.manifest.name
    }
}

/// Registry of every known plugin.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    /// Plugin name → runtime record.
    plugins: RwLock<HashMap<String, PluginInfo>>,
}

impl PluginRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            plugins: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a plugin record.
    pub async fn register(&self, info: PluginInfo) -> Result<(), PluginError> {
        let mut plugins = self.plugins.write().await;
        let name = info.name().to_string();

        if plugins.contains_key(&name) {
            return Err(PluginError::DuplicateName { name });
        }

        info!(
            plugin = %name,
            version = %info.manifest.version,
            "Registering plugin"
        );
        plugins.insert(name, info);
        Ok(())
    }

    /// Removes a plugin record, returning it if present.
    pub async fn unregister(&self, name: &str) -> Option<PluginInfo> {
        let mut plugins = self.plugins.write().await;
        let removed = plugins.remove(name);
        if removed.is_some() {
            info!(plugin = %name, "Plugin unregistered");
        }
        removed
    }

    /// Gets a plugin record by name.
    pub async fn get(&self, name: &str) -> Option<PluginInfo> {
        let plugins = self.plugins.read().await;
        plugins.get(name).cloned()
    }

    /// Checks whether a plugin is registered.
    pub async fn has(&self, name: &str) -> bool {
        let plugins = self.plugins.read().await;
        plugins.contains_key(name)
    }

    /// Lists all registered plugins, sorted by name.
    pub async fn list(&self) -> Vec<PluginInfo> {
        let plugins = self.plugins.read().await;
        let mut infos: Vec<PluginInfo> = plugins.values().cloned().collect();
        infos.sort_by(|a, b| a.name().cmp(b.name()));
        infos
    }

    /// Lists plugins currently in a given state.
    pub async fn list_by_state(&self, state: PluginState) -> Vec<PluginInfo> {
        let plugins = self.plugins.read().await;
        let mut infos: Vec<PluginInfo> = plugins
            .values()
            .filter(|info| info.state == state)
            .cloned()
            .collect();
        infos.sort_by(|a, b| a.name().cmp(b.name()));
        infos
    }

    /// Lists plugins of a given declared type.
    pub async fn list_by_type(&self, plugin_type: PluginType) -> Vec<PluginInfo> {
        let plugins = self.plugins.read().await;
        let mut infos: Vec<PluginInfo> = plugins
            .values()
            .filter(|info| info.manifest.plugin_type == plugin_type)
            .cloned()
            .collect();
        infos.sort_by(|a, b| a.name().cmp(b.name()));
        infos
    }

    /// Transitions a plugin to a new state, returning the updated record.
    ///
    /// The stored error message is replaced when the new state is
    /// [`PluginState::Error`] and cleared for every other state. Entering
    /// [`PluginState::Loaded`] stamps `loaded_at`.
    pub async fn update_state(
        &self,
        name: &str,
        state: PluginState,
        error: Option<String>,
    ) -> Option<PluginInfo> {
        let mut plugins = self.plugins.write().await;
        let info = plugins.get_mut(name)?;

        debug!(plugin = %name, from = %info.state, to = %state, "Plugin state transition");
        info.state = state;
        info.error = if state == PluginState::Error {
            error
        } else {
            None
        };
        if state == PluginState::Loaded {
            info.loaded_at = Some(Utc::now());
        }
        Some(info.clone())
    }

    /// Returns the total plugin count.
    pub async fn count(&self) -> usize {
        let plugins = self.plugins.read().await;
        plugins.len()
    }

    /// Returns the number of enabled plugins.
    pub async fn count_enabled(&self) -> usize {
        let plugins = self.plugins.read().await;
        plugins
            .values()
            .filter(|info| info.state == PluginState::Enabled)
            .count()
    }

    /// Returns a histogram of plugin counts per state.
    pub async fn count_by_state(&self) -> HashMap<PluginState, usize> {
        let plugins = self.plugins.read().await;
        let mut counts = HashMap::new();
        for info in plugins.values() {
            *counts.entry(info.state).or_insert(0) += 1;
        }
        counts
    }

    /// Gets a plugin's config value, falling back to `default` when the
    /// plugin or key is unknown.
    pub async fn get_config(&self, name: &str, key: &str, default: Value) -> Value {
        let plugins = self.plugins.read().await;
        plugins
            .get(name)
            .and_then(|info| info.config.get(key).cloned())
            .unwrap_or(default)
    }

    /// Sets a plugin's config value.
    pub async fn set_config(&self, name: &str, key: &str, value: Value) -> Result<(), PluginError> {
        let mut plugins = self.plugins.write().await;
        let info = plugins
            .get_mut(name)
            .ok_or_else(|| PluginError::UnknownPlugin {
                name: name.to_string(),
            })?;
        info.config.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;

    fn info(name: &str) -> PluginInfo {
        let manifest = Manifest::parse_str(&format!(
            r#"{{"name": "{name}", "version": "1.0.0",
                "config": {{"limit": {{"type": "int", "default": 5}}}}}}"#
        ))
        .expect("parse");
        PluginInfo::new(manifest, PathBuf::from(format!("/plugins/{name}")))
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates() {
        let registry = PluginRegistry::new();
        registry.register(info("p1")).await.expect("register");
        let err = registry.register(info("p1")).await.unwrap_err();
        assert!(matches!(err, PluginError::DuplicateName { .. }));
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_config_defaults_applied_once() {
        let registry = PluginRegistry::new();
        registry.register(info("p1")).await.expect("register");
        assert_eq!(
            registry
                .get_config("p1", "limit", serde_json::json!(0))
                .await,
            serde_json::json!(5)
        );
        assert_eq!(
            registry
                .get_config("p1", "missing", serde_json::json!("fallback"))
                .await,
            serde_json::json!("fallback")
        );
        assert_eq!(
            registry
                .get_config("ghost", "limit", serde_json::json!(0))
                .await,
            serde_json::json!(0)
        );
    }

    #[tokio::test]
    async fn test_update_state_clears_error_outside_error_state() {
        let registry = PluginRegistry::new();
        registry.register(info("p1")).await.expect("register");

        let updated = registry
            .update_state("p1", PluginState::Error, Some("broke".to_string()))
            .await
            .expect("known");
        assert_eq!(updated.state, PluginState::Error);
        assert_eq!(updated.error.as_deref(), Some("broke"));

        let updated = registry
            .update_state("p1", PluginState::Discovered, None)
            .await
            .expect("known");
        assert_eq!(updated.state, PluginState::Discovered);
        assert!(updated.error.is_none());

        assert!(
            registry
                .update_state("ghost", PluginState::Loaded, None)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_loaded_transition_stamps_time() {
        let registry = PluginRegistry::new();
        registry.register(info("p1")).await.expect("register");
        let updated = registry
            .update_state("p1", PluginState::Loaded, None)
            .await
            .expect("known");
        assert!(updated.loaded_at.is_some());
    }

    #[tokio::test]
    async fn test_counts_and_filters() {
        let registry = PluginRegistry::new();
        for name in ["a", "b", "c"] {
            registry.register(info(name)).await.expect("register");
        }
        registry
            .update_state("a", PluginState::Enabled, None)
            .await
            .expect("known");
        registry
            .update_state("b", PluginState::Enabled, None)
            .await
            .expect("known");

        assert_eq!(registry.count().await, 3);
        assert_eq!(registry.count_enabled().await, 2);
        assert_eq!(
            registry.list_by_state(PluginState::Discovered).await.len(),
            1
        );
        let histogram = registry.count_by_state().await;
        assert_eq!(histogram[&PluginState::Enabled], 2);
        assert_eq!(histogram[&PluginState::Discovered], 1);
    }
}
