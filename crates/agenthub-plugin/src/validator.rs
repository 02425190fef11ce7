//! Structural validation of manifests and resolved module exports.
//!
//! Every check is pure and returns a list of human-readable problems; an
//! empty list means valid. Capability shape is checked structurally
//! against the export's kind — the async method contracts themselves are
//! enforced by the `Agent`/`Monitor`/`EventHandler` traits at compile
//! time, so a symbol of the right kind is always callable.

use crate::hooks::definitions::HookEvent;
use crate::loader::Export;
use crate::manifest::Manifest;

/// Validates a manifest's structure.
pub fn validate_manifest(manifest: &Manifest) -> Vec<String> {
    let mut problems = Vec::new();

    if manifest.name.trim().is_empty() {
        problems.push("plugin name must not be empty".to_string());
    } else if !manifest
        .name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        problems.push(format!(
            "plugin name '{}' may only contain alphanumerics, dash, and underscore",
            manifest.name
        ));
    }

    if manifest.version.trim().is_empty() {
        problems.push("plugin version must not be empty".to_string());
    }

    for hook in &manifest.provides.hooks {
        if hook.event.parse::<HookEvent>().is_err() {
            problems.push(format!(
                "hook event '{}' is not in the event vocabulary",
                hook.event
            ));
        }
        if !hook.handler.contains('.') {
            problems.push(format!(
                "hook handler '{}' must be a dotted 'module.function' locator",
                hook.handler
            ));
        }
    }

    problems
}

/// Checks that a resolved symbol is an agent implementation.
pub fn validate_agent_export(symbol: &str, export: &Export) -> Vec<String> {
    match export {
        Export::Agent(_) => Vec::new(),
        other => vec![format!(
            "symbol '{symbol}' is a {} export but an agent implementation is required",
            other.kind()
        )],
    }
}

/// Checks that a resolved symbol is a monitor implementation.
pub fn validate_monitor_export(symbol: &str, export: &Export) -> Vec<String> {
    match export {
        Export::Monitor(_) => Vec::new(),
        other => vec![format!(
            "symbol '{symbol}' is a {} export but a monitor implementation is required",
            other.kind()
        )],
    }
}

/// Checks that a resolved symbol is a constructible tool.
pub fn validate_tool_export(symbol: &str, export: &Export) -> Vec<String> {
    match export {
        Export::Tool(_) => Vec::new(),
        other => vec![format!(
            "symbol '{symbol}' is a {} export but a constructible tool is required",
            other.kind()
        )],
    }
}

/// Checks that a resolved symbol is an async hook handler.
pub fn validate_hook_export(symbol: &str, export: &Export) -> Vec<String> {
    match export {
        Export::Hook(_) => Vec::new(),
        other => vec![format!(
            "symbol '{symbol}' is a {} export but an async hook handler is required",
            other.kind()
        )],
    }
}
