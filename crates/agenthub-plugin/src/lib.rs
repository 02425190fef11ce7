//! # agenthub-plugin
//!
//! Plugin runtime for AgentHub. Provides:
//!
//! - Manifest parsing and filesystem discovery
//! - Structural validation of manifests and loaded exports
//! - Module loading into per-plugin namespaces with symmetric unload
//! - Plugin registry tracking lifecycle state and per-plugin config
//! - Hook bus with priority-ordered, fault-isolated event dispatch
//! - The plugin manager driving the full lifecycle state machine
//! - Optional dynamic loading via `libloading` (feature `dynamic`)

pub mod error;
pub mod hooks;
pub mod loader;
pub mod macros;
pub mod manager;
pub mod manifest;
pub mod registry;
pub mod traits;
pub mod validator;

pub use error::PluginError;
pub use hooks::definitions::{HookEvent, HookPayload};
pub use hooks::dispatcher::HookDispatcher;
pub use hooks::registry::{EventHandler, HookBus};
pub use loader::{Export, LoadedComponents, Loader, ModuleExports, ModuleRegistry, ModuleSource};
pub use manager::PluginManager;
pub use manifest::{Manifest, PluginType};
pub use registry::{PluginInfo, PluginRegistry, PluginState};
pub use traits::{Agent, InMemoryMasterRegistry, MasterRegistry, Monitor, Tool};
