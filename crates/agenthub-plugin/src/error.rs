//! Plugin runtime error taxonomy.
//!
//! Every failure mode of the plugin subsystem maps to one variant here.
//! The boundary crates convert [`PluginError`] into the unified
//! [`AppError`] via the `From` impl at the bottom.

use thiserror::Error;

use agenthub_core::error::{AppError, ErrorKind};

use crate::registry::PluginState;

/// Errors produced by the plugin runtime.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The descriptor text was not well-formed.
    #[error("failed to parse plugin manifest: {message}")]
    Parse {
        /// Parser diagnostic.
        message: String,
    },

    /// The descriptor parsed but violates structural rules.
    #[error("manifest validation failed: {}", problems.join("; "))]
    Validation {
        /// Human-readable problem list (never empty).
        problems: Vec<String>,
    },

    /// A failure occurred while loading a plugin's modules or
    /// instantiating its declared classes. Wraps the root cause.
    #[error("failed to load plugin '{plugin}': {message}")]
    Load {
        /// Plugin being loaded.
        plugin: String,
        /// Root cause description.
        message: String,
    },

    /// Registration with the host failed while enabling a plugin.
    #[error("failed to register plugin '{plugin}' with the host: {message}")]
    Registration {
        /// Plugin being enabled.
        plugin: String,
        /// Failure reported by the host registry.
        message: String,
    },

    /// An operation referenced a plugin name absent from the registry.
    #[error("unknown plugin '{name}'")]
    UnknownPlugin {
        /// The unrecognized name.
        name: String,
    },

    /// A plugin with this name is already registered.
    #[error("plugin '{name}' is already registered")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },

    /// The operation is invalid for the plugin's current state.
    #[error("cannot {operation} plugin '{name}' in state {from}")]
    InvalidTransition {
        /// Plugin name.
        name: String,
        /// State the plugin was in.
        from: PluginState,
        /// The attempted operation.
        operation: &'static str,
    },
}

impl From<PluginError> for AppError {
    fn from(err: PluginError) -> Self {
        let kind = match &err {
            PluginError::Parse { .. } | PluginError::Validation { .. } => ErrorKind::Validation,
            PluginError::UnknownPlugin { .. } => ErrorKind::NotFound,
            PluginError::DuplicateName { .. } | PluginError::InvalidTransition { .. } => {
                ErrorKind::Conflict
            }
            PluginError::Load { .. } | PluginError::Registration { .. } => ErrorKind::Plugin,
        };
        AppError::new(kind, err.to_string())
    }
}
