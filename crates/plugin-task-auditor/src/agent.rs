//! The audit agent: answers questions about the recorded audit trail.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use agenthub_plugin::Agent;

use crate::audit::{AuditLog, TaskOutcome};

/// Agent exposing the audit trail to the host.
///
/// `execute` with `{"action": "summary"}` returns outcome counts;
/// `{"action": "dump"}` returns the full trail. `analyze` inspects a
/// single record-shaped value and classifies it.
#[derive(Debug)]
pub struct AuditAgent {
    /// Shared audit trail.
    log: Arc<AuditLog>,
}

impl AuditAgent {
    /// Creates a new audit agent over a shared log.
    pub fn new(log: Arc<AuditLog>) -> Self {
        Self { log }
    }

    async fn summary(&self) -> Value {
        json!({
            "total": self.log.len().await,
            "completed": self.log.count_outcome(TaskOutcome::Completed).await,
            "failed": self.log.count_outcome(TaskOutcome::Failed).await,
        })
    }
}

#[async_trait]
impl Agent for AuditAgent {
    fn name(&self) -> &str {
        "task-auditor"
    }

    async fn execute(&self, task: Value) -> Result<Value, String> {
        let action = task
            .get("action")
            .and_then(|v| v.as_str())
            .unwrap_or("summary");

        match action {
            "summary" => Ok(self.summary().await),
            "dump" => {
                let records = self.log.snapshot().await;
                serde_json::to_value(records).map_err(|e| format!("cannot serialize trail: {e}"))
            }
            other => Err(format!("unknown audit action '{other}'")),
        }
    }

    async fn analyze(&self, input: Value) -> Result<Value, String> {
        let outcome = input.get("outcome").and_then(|v| v.as_str());
        Ok(json!({
            "recognized": matches!(outcome, Some("completed" | "failed")),
            "outcome": outcome,
        }))
    }

    async fn report(&self) -> Result<Value, String> {
        Ok(self.summary().await)
    }
}
