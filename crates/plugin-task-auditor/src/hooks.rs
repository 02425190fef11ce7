//! Hook handlers recording task outcomes into the audit trail.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use agenthub_plugin::hooks::definitions::HookPayload;
use agenthub_plugin::hooks::registry::EventHandler;

use crate::audit::{AuditLog, TaskOutcome};

/// Handler for `task_completed`: records a successful outcome.
#[derive(Debug)]
pub struct TaskCompletedHook {
    /// Shared audit trail.
    log: Arc<AuditLog>,
}

impl TaskCompletedHook {
    /// Creates a new task_completed hook handler.
    pub fn new(log: Arc<AuditLog>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl EventHandler for TaskCompletedHook {
    async fn handle(&self, payload: &HookPayload) -> Result<(), String> {
        let task_id = payload.get_string("task_id").map(str::to_string);
        let agent = payload.get_string("agent").map(str::to_string);
        let detail = payload.get_data("result").cloned();

        debug!(task_id = ?task_id, "Auditing completed task");
        self.log
            .record(task_id, agent, TaskOutcome::Completed, detail)
            .await;
        Ok(())
    }
}

/// Handler for `task_failed`: records a failed outcome with its error.
#[derive(Debug)]
pub struct TaskFailedHook {
    /// Shared audit trail.
    log: Arc<AuditLog>,
}

impl TaskFailedHook {
    /// Creates a new task_failed hook handler.
    pub fn new(log: Arc<AuditLog>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl EventHandler for TaskFailedHook {
    async fn handle(&self, payload: &HookPayload) -> Result<(), String> {
        let task_id = payload.get_string("task_id").map(str::to_string);
        let agent = payload.get_string("agent").map(str::to_string);
        let detail = payload.get_data("error").cloned();

        debug!(task_id = ?task_id, "Auditing failed task");
        self.log
            .record(task_id, agent, TaskOutcome::Failed, detail)
            .await;
        Ok(())
    }
}
