//! Tool for dumping the audit trail.

use std::sync::Arc;

use serde_json::Value;

use agenthub_plugin::Tool;

use crate::audit::AuditLog;

/// Tool that renders the audit trail as JSON.
#[derive(Debug)]
pub struct LogDumpTool {
    /// Shared audit trail.
    log: Arc<AuditLog>,
}

impl LogDumpTool {
    /// Creates a new dump tool over a shared log.
    pub fn new(log: Arc<AuditLog>) -> Self {
        Self { log }
    }

    /// Serializes the full trail, oldest record first.
    pub async fn dump(&self) -> Result<Value, String> {
        let records = self.log.snapshot().await;
        serde_json::to_value(records).map_err(|e| format!("cannot serialize trail: {e}"))
    }
}

impl Tool for LogDumpTool {
    fn name(&self) -> &str {
        "audit-log-dump"
    }
}
