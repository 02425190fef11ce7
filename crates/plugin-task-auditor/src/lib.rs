//! Task auditing plugin for AgentHub.
//!
//! Records task outcomes flowing through the hook bus into an in-memory
//! audit trail, and exposes an agent that answers questions about it.
//! The plugin's manifest lives under `plugins/task-auditor/`; this crate
//! provides the module sources it references.

pub mod agent;
pub mod audit;
pub mod hooks;
pub mod tool;

use std::sync::Arc;

use agenthub_plugin::ModuleRegistry;
use agenthub_plugin_sdk::module_exports;

use crate::agent::AuditAgent;
use crate::audit::AuditLog;
use crate::hooks::{TaskCompletedHook, TaskFailedHook};
use crate::tool::LogDumpTool;

/// Registers this plugin's module sources with the host.
///
/// All three modules share one audit log, so records written by the
/// hook handlers are visible to the agent and the dump tool.
pub async fn register_modules(modules: &ModuleRegistry) {
    let log = Arc::new(AuditLog::new());

    let agents_log = log.clone();
    modules
        .register_fn("task_auditor.agents", move || {
            let log = agents_log.clone();
            module_exports! {
                agent "AuditAgent" => move || Arc::new(AuditAgent::new(log.clone())),
            }
        })
        .await;

    let hooks_log = log.clone();
    modules
        .register_fn("task_auditor.hooks", move || {
            let log = hooks_log.clone();
            module_exports! {
                hook "on_task_completed" => Arc::new(TaskCompletedHook::new(log.clone())),
                hook "on_task_failed" => Arc::new(TaskFailedHook::new(log.clone())),
            }
        })
        .await;

    modules
        .register_fn("task_auditor.tools", move || {
            let log = log.clone();
            module_exports! {
                tool "LogDumpTool" => move || Arc::new(LogDumpTool::new(log.clone())),
            }
        })
        .await;
}
