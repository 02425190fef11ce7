//! The in-memory audit trail shared across this plugin's modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

/// Outcome of one audited task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    /// The task completed successfully.
    Completed,
    /// The task failed.
    Failed,
}

/// One audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Identifier of the audited task, when the emitter supplied one.
    pub task_id: Option<String>,
    /// Agent that handled the task, when known.
    pub agent: Option<String>,
    /// How the task ended.
    pub outcome: TaskOutcome,
    /// Extra detail carried by the event (error message, duration).
    pub detail: Option<Value>,
    /// When the record was written.
    pub recorded_at: DateTime<Utc>,
}

/// Append-only log of task outcomes.
#[derive(Debug, Default)]
pub struct AuditLog {
    records: RwLock<Vec<AuditRecord>>,
}

impl AuditLog {
    /// Creates an empty audit log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub async fn record(
        &self,
        task_id: Option<String>,
        agent: Option<String>,
        outcome: TaskOutcome,
        detail: Option<Value>,
    ) {
        let mut records = self.records.write().await;
        records.push(AuditRecord {
            task_id,
            agent,
            outcome,
            detail,
            recorded_at: Utc::now(),
        });
    }

    /// Returns a snapshot of every record, oldest first.
    pub async fn snapshot(&self) -> Vec<AuditRecord> {
        let records = self.records.read().await;
        records.clone()
    }

    /// Returns the total number of records.
    pub async fn len(&self) -> usize {
        let records = self.records.read().await;
        records.len()
    }

    /// Returns true when nothing has been recorded.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns how many records carry a given outcome.
    pub async fn count_outcome(&self, outcome: TaskOutcome) -> usize {
        let records = self.records.read().await;
        records.iter().filter(|r| r.outcome == outcome).count()
    }
}
