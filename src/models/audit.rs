use serde::{Deserialize, Serialize};

use super::TaskStatus;

/// One status transition in a task's append-only history.
///
/// `sequence` is 1-based and monotonic per task; it is the ordering key.
/// Timestamps are never used to order entries since clocks may collide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub task_id: String,
    pub sequence: i64,
    pub from_status: TaskStatus,
    pub to_status: TaskStatus,
    pub actor: String,
    pub at: String,
    pub comment: Option<String>,
}
