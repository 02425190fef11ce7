//! Plugin manifest parsing and filesystem discovery.
//!
//! A plugin package is a directory containing a `plugin.json` descriptor.
//! Descriptors accept two legacy key aliases: `type` for `plugin_type` and,
//! inside each provision, `class` for `class_name`. The canonical key always
//! wins when both are present.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::PluginError;

/// Descriptor file name looked up inside each plugin directory.
pub const MANIFEST_FILE: &str = "plugin.json";

/// Category of capability a plugin primarily provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginType {
    /// Provides one or more agents.
    Agent,
    /// Provides callable tools.
    Tool,
    /// Provides periodic monitors.
    Monitor,
    /// Provides hook handlers only.
    Hook,
    /// Provides a mix of capability kinds.
    Mixed,
}

impl PluginType {
    /// Returns the string name of this plugin type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Tool => "tool",
            Self::Monitor => "monitor",
            Self::Hook => "hook",
            Self::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for PluginType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An agent implementation declared by a plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProvision {
    /// Module path the implementation lives in.
    pub module: String,
    /// Exported class name.
    pub class_name: String,
    /// Routing keywords registered alongside the agent.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A periodic monitor declared by a plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorProvision {
    /// Module path the implementation lives in.
    pub module: String,
    /// Exported class name.
    pub class_name: String,
    /// Check interval in seconds.
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,
}

/// A callable tool declared by a plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolProvision {
    /// Module path the implementation lives in.
    pub module: String,
    /// Exported class name.
    pub class_name: String,
}

/// A hook binding declared by a plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookProvision {
    /// Event name from the fixed hook vocabulary.
    pub event: String,
    /// Dotted handler locator: `module.path.function`.
    pub handler: String,
    /// Execution priority (lower runs earlier).
    #[serde(default = "default_priority")]
    pub priority: i32,
}

/// Everything a plugin provides, grouped by capability kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Provides {
    /// Agent provisions.
    #[serde(default)]
    pub agents: Vec<AgentProvision>,
    /// Monitor provisions.
    #[serde(default)]
    pub monitors: Vec<MonitorProvision>,
    /// Tool provisions.
    #[serde(default)]
    pub tools: Vec<ToolProvision>,
    /// Hook provisions.
    #[serde(default)]
    pub hooks: Vec<HookProvision>,
}

impl Provides {
    /// Returns true when no capability of any kind is declared.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
            && self.monitors.is_empty()
            && self.tools.is_empty()
            && self.hooks.is_empty()
    }
}

/// A declared configuration field with its default and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigField {
    /// Declared value type (informational, e.g. `"string"`, `"int"`).
    #[serde(rename = "type", default)]
    pub field_type: String,
    /// Default value applied at discovery time.
    #[serde(default)]
    pub default: Option<Value>,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Whether a value must be supplied.
    #[serde(default)]
    pub required: bool,
}

/// Immutable declarative description of one plugin.
///
/// Produced by [`Manifest::parse_str`] or [`discover`]; read-only after
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Unique plugin name (alphanumerics, dash, underscore).
    pub name: String,
    /// Plugin version string.
    pub version: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Author or maintainer.
    #[serde(default)]
    pub author: String,
    /// Primary capability category.
    #[serde(default = "default_plugin_type")]
    pub plugin_type: PluginType,
    /// Minimum host version this plugin is compatible with.
    #[serde(default)]
    pub min_host_version: Option<String>,
    /// Names of plugins that must be active before this one.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Declared capabilities.
    #[serde(default)]
    pub provides: Provides,
    /// Declared configuration fields.
    #[serde(default)]
    pub config: HashMap<String, ConfigField>,
}

// ── Raw descriptor shapes (alias normalization) ──────────────────────

#[derive(Debug, Deserialize)]
struct RawProvision {
    module: Option<String>,
    class_name: Option<String>,
    class: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    check_interval: Option<u64>,
}

impl RawProvision {
    /// Resolves the `class` alias; the canonical `class_name` wins.
    fn class_name(&self, plugin: &str, kind: &str) -> Result<String, PluginError> {
        self.class_name
            .clone()
            .or_else(|| self.class.clone())
            .ok_or_else(|| PluginError::Validation {
                problems: vec![format!(
                    "plugin '{plugin}': {kind} provision is missing 'class_name'"
                )],
            })
    }

    fn module(&self, plugin: &str, kind: &str) -> Result<String, PluginError> {
        self.module.clone().ok_or_else(|| PluginError::Validation {
            problems: vec![format!(
                "plugin '{plugin}': {kind} provision is missing 'module'"
            )],
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawProvides {
    #[serde(default)]
    agents: Vec<RawProvision>,
    #[serde(default)]
    monitors: Vec<RawProvision>,
    #[serde(default)]
    tools: Vec<RawProvision>,
    #[serde(default)]
    hooks: Vec<HookProvision>,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    author: String,
    plugin_type: Option<PluginType>,
    #[serde(rename = "type")]
    type_alias: Option<PluginType>,
    #[serde(default)]
    min_host_version: Option<String>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    provides: RawProvides,
    #[serde(default)]
    config: HashMap<String, ConfigField>,
}

impl Manifest {
    /// Parses a descriptor from JSON text.
    ///
    /// Returns [`PluginError::Parse`] for malformed JSON and
    /// [`PluginError::Validation`] when required fields are missing.
    pub fn parse_str(raw: &str) -> Result<Self, PluginError> {
        let raw: RawManifest = serde_json::from_str(raw).map_err(|e| PluginError::Parse {
            message: e.to_string(),
        })?;

        let mut problems = Vec::new();
        if raw.name.trim().is_empty() {
            problems.push("manifest is missing required field 'name'".to_string());
        }
        if raw.version.trim().is_empty() {
            problems.push("manifest is missing required field 'version'".to_string());
        }
        if !problems.is_empty() {
            return Err(PluginError::Validation { problems });
        }

        let name = raw.name;

        let mut agents = Vec::with_capacity(raw.provides.agents.len());
        for p in &raw.provides.agents {
            agents.push(AgentProvision {
                module: p.module(&name, "agent")?,
                class_name: p.class_name(&name, "agent")?,
                keywords: p.keywords.clone(),
            });
        }

        let mut monitors = Vec::with_capacity(raw.provides.monitors.len());
        for p in &raw.provides.monitors {
            monitors.push(MonitorProvision {
                module: p.module(&name, "monitor")?,
                class_name: p.class_name(&name, "monitor")?,
                check_interval: p.check_interval.unwrap_or_else(default_check_interval),
            });
        }

        let mut tools = Vec::with_capacity(raw.provides.tools.len());
        for p in &raw.provides.tools {
            tools.push(ToolProvision {
                module: p.module(&name, "tool")?,
                class_name: p.class_name(&name, "tool")?,
            });
        }

        Ok(Self {
            name,
            version: raw.version,
            description: raw.description,
            author: raw.author,
            // Canonical key wins over the `type` alias.
            plugin_type: raw
                .plugin_type
                .or(raw.type_alias)
                .unwrap_or_else(default_plugin_type),
            min_host_version: raw.min_host_version,
            dependencies: raw.dependencies,
            provides: Provides {
                agents,
                monitors,
                tools,
                hooks: raw.provides.hooks,
            },
            config: raw.config,
        })
    }

    /// Parses a descriptor from a file on disk.
    pub fn parse_file(path: &Path) -> Result<Self, PluginError> {
        let raw = std::fs::read_to_string(path).map_err(|e| PluginError::Parse {
            message: format!("cannot read '{}': {e}", path.display()),
        })?;
        Self::parse_str(&raw)
    }
}

/// Scans `root` for plugin packages and returns every valid manifest.
///
/// Enumerates immediate subdirectories, skipping names that begin with
/// `_` or `.`. A directory whose descriptor is missing, unreadable, or
/// invalid is logged and skipped; the scan itself never fails. A missing
/// root yields an empty result.
pub fn discover(root: &Path) -> Vec<(PathBuf, Manifest)> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(root = %root.display(), error = %e, "Plugin root is not readable");
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    for entry in entries.flatten() {
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let dir_name = entry.file_name();
        let dir_name = dir_name.to_string_lossy();
        if dir_name.starts_with('_') || dir_name.starts_with('.') {
            debug!(dir = %dir.display(), "Skipping hidden plugin directory");
            continue;
        }

        let descriptor = dir.join(MANIFEST_FILE);
        match Manifest::parse_file(&descriptor) {
            Ok(manifest) => {
                debug!(
                    plugin = %manifest.name,
                    version = %manifest.version,
                    dir = %dir.display(),
                    "Discovered plugin"
                );
                found.push((dir, manifest));
            }
            Err(e) => {
                warn!(
                    dir = %dir.display(),
                    error = %e,
                    "Skipping plugin directory with invalid descriptor"
                );
            }
        }
    }

    found
}

fn default_plugin_type() -> PluginType {
    PluginType::Mixed
}

fn default_check_interval() -> u64 {
    60
}

fn default_priority() -> i32 {
    100
}
