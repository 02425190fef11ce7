//! # agenthub-plugin-sdk
//!
//! SDK for developing plugins for AgentHub.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use agenthub_plugin_sdk::prelude::*;
//!
//! #[derive(Debug)]
//! struct EchoAgent;
//!
//! #[async_trait]
//! impl Agent for EchoAgent {
//!     fn name(&self) -> &str {
//!         "echo"
//!     }
//!
//!     async fn execute(&self, task: Value) -> Result<Value, String> {
//!         Ok(task)
//!     }
//!
//!     async fn analyze(&self, input: Value) -> Result<Value, String> {
//!         Ok(input)
//!     }
//!
//!     async fn report(&self) -> Result<Value, String> {
//!         Ok(json!({"status": "idle"}))
//!     }
//! }
//!
//! pub fn agents_module() -> ModuleExports {
//!     module_exports! {
//!         agent "EchoAgent" => || Arc::new(EchoAgent),
//!     }
//! }
//! ```

pub mod macros;

pub use agenthub_plugin::hooks::registry::FnHandler;
pub use agenthub_plugin::loader::{Export, ModuleExports};
pub use agenthub_plugin::{
    Agent, EventHandler, HookEvent, HookPayload, Monitor, PluginType, Tool,
};

/// Prelude for convenient imports in plugin crates.
pub mod prelude {
    pub use std::sync::Arc;

    pub use async_trait::async_trait;
    pub use serde_json::{Value, json};

    pub use agenthub_plugin::hooks::definitions::{HookEvent, HookPayload};
    pub use agenthub_plugin::hooks::registry::{EventHandler, FnHandler};
    pub use agenthub_plugin::loader::ModuleExports;
    pub use agenthub_plugin::traits::{Agent, Monitor, Tool};

    pub use crate::module_exports;
}
