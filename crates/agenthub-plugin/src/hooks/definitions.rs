//! Hook event vocabulary and payload type.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Enumeration of every event the hook bus can carry.
///
/// The vocabulary is fixed: manifests referencing any other event name
/// fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookEvent {
    // ── Task lifecycle ──
    /// A task was created.
    TaskCreated,
    /// A task began executing.
    TaskStarted,
    /// A task finished successfully.
    TaskCompleted,
    /// A task failed.
    TaskFailed,
    /// A task was cancelled.
    TaskCancelled,

    // ── Agent lifecycle ──
    /// An agent was selected to handle a task.
    AgentSelected,
    /// An agent was registered with the host.
    AgentRegistered,
    /// An agent was unregistered from the host.
    AgentUnregistered,

    // ── System lifecycle ──
    /// The host finished starting up.
    SystemStartup,
    /// The host is shutting down.
    SystemShutdown,

    // ── Plugin lifecycle ──
    /// A plugin's modules were loaded.
    PluginLoaded,
    /// A plugin was enabled.
    PluginEnabled,
    /// A plugin was disabled.
    PluginDisabled,

    // ── Decision lifecycle ──
    /// An autonomous decision was recorded.
    DecisionMade,
    /// A human approval was requested.
    ApprovalRequested,
    /// A human approval was answered.
    ApprovalResponded,
}

/// All members of the event vocabulary, for validation and enumeration.
pub const ALL_EVENTS: [HookEvent; 16] = [
    HookEvent::TaskCreated,
    HookEvent::TaskStarted,
    HookEvent::TaskCompleted,
    HookEvent::TaskFailed,
    HookEvent::TaskCancelled,
    HookEvent::AgentSelected,
    HookEvent::AgentRegistered,
    HookEvent::AgentUnregistered,
    HookEvent::SystemStartup,
    HookEvent::SystemShutdown,
    HookEvent::PluginLoaded,
    HookEvent::PluginEnabled,
    HookEvent::PluginDisabled,
    HookEvent::DecisionMade,
    HookEvent::ApprovalRequested,
    HookEvent::ApprovalResponded,
];

impl HookEvent {
    /// Returns the string name of this event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskCreated => "task_created",
            Self::TaskStarted => "task_started",
            Self::TaskCompleted => "task_completed",
            Self::TaskFailed => "task_failed",
            Self::TaskCancelled => "task_cancelled",
            Self::AgentSelected => "agent_selected",
            Self::AgentRegistered => "agent_registered",
            Self::AgentUnregistered => "agent_unregistered",
            Self::SystemStartup => "system_startup",
            Self::SystemShutdown => "system_shutdown",
            Self::PluginLoaded => "plugin_loaded",
            Self::PluginEnabled => "plugin_enabled",
            Self::PluginDisabled => "plugin_disabled",
            Self::DecisionMade => "decision_made",
            Self::ApprovalRequested => "approval_requested",
            Self::ApprovalResponded => "approval_responded",
        }
    }
}

impl FromStr for HookEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_EVENTS
            .iter()
            .find(|e| e.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown hook event '{s}'"))
    }
}

impl std::fmt::Display for HookEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload passed to hook handlers — a flexible key-value map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookPayload {
    /// The event being emitted.
    pub event: HookEvent,
    /// Arbitrary data keyed by string.
    pub data: HashMap<String, Value>,
    /// Timestamp of the emission.
    pub timestamp: DateTime<Utc>,
}

impl HookPayload {
    /// Creates a new empty payload for an event.
    pub fn new(event: HookEvent) -> Self {
        Self {
            event,
            data: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Creates a payload carrying an existing data map.
    pub fn with_map(event: HookEvent, data: HashMap<String, Value>) -> Self {
        Self {
            event,
            data,
            timestamp: Utc::now(),
        }
    }

    /// Inserts a typed data value.
    pub fn with_data(mut self, key: &str, value: Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    /// Inserts a string value.
    pub fn with_string(self, key: &str, value: &str) -> Self {
        self.with_data(key, serde_json::json!(value))
    }

    /// Inserts an integer value.
    pub fn with_int(self, key: &str, value: i64) -> Self {
        self.with_data(key, serde_json::json!(value))
    }

    /// Gets a data value by key.
    pub fn get_data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Gets a string data value.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    /// Gets an i64 data value.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.data.get(key).and_then(|v| v.as_i64())
    }
}
