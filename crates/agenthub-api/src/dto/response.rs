//! Response DTOs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use agenthub_plugin::{HookEvent, PluginInfo, PluginState, PluginType};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Plugin list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginListResponse {
    /// Plugin summaries.
    pub plugins: Vec<PluginSummary>,
    /// Total known plugins.
    pub total: usize,
}

/// Result of re-running discovery and batch-loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadAllResponse {
    /// Plugins known after re-discovery.
    pub discovered: usize,
    /// Plugins enabled after the batch load.
    pub enabled: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Total known plugins.
    pub plugins: usize,
    /// Enabled plugins.
    pub plugins_enabled: usize,
}

/// Plugin summary for list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginSummary {
    /// Generated plugin ID.
    pub id: Uuid,
    /// Plugin name.
    pub name: String,
    /// Plugin version.
    pub version: String,
    /// Description.
    pub description: String,
    /// Declared capability category.
    pub plugin_type: PluginType,
    /// Current lifecycle state.
    pub state: PluginState,
    /// Error message, present only in the error state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When modules were last loaded.
    pub loaded_at: Option<DateTime<Utc>>,
}

impl From<PluginInfo> for PluginSummary {
    fn from(info: PluginInfo) -> Self {
        Self {
            id: info.id,
            name: info.manifest.name.clone(),
            version: info.manifest.version.clone(),
            description: info.manifest.description.clone(),
            plugin_type: info.manifest.plugin_type,
            state: info.state,
            error: info.error,
            loaded_at: info.loaded_at,
        }
    }
}

/// Full plugin detail response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginDetail {
    /// Summary fields.
    #[serde(flatten)]
    pub summary: PluginSummary,
    /// Author or maintainer.
    pub author: String,
    /// Plugins that must be active before this one.
    pub dependencies: Vec<String>,
    /// Declared agent count.
    pub agents: usize,
    /// Declared monitor count.
    pub monitors: usize,
    /// Declared tool count.
    pub tools: usize,
    /// Live hook registrations per event (empty unless enabled).
    pub active_hooks: HashMap<HookEvent, usize>,
    /// Resolved configuration values.
    pub config: HashMap<String, Value>,
}

impl PluginDetail {
    /// Builds a detail view from a registry record and the plugin's live
    /// hook registrations.
    pub fn from_info(info: PluginInfo, active_hooks: HashMap<HookEvent, usize>) -> Self {
        Self {
            author: info.manifest.author.clone(),
            dependencies: info.manifest.dependencies.clone(),
            agents: info.manifest.provides.agents.len(),
            monitors: info.manifest.provides.monitors.len(),
            tools: info.manifest.provides.tools.len(),
            config: info.config.clone(),
            active_hooks,
            summary: info.into(),
        }
    }
}
