//! Progress aggregation over a task-set snapshot.
//!
//! Pure counting; the aggregator never touches the store and does not care
//! which scope produced the snapshot. No rounding here, display rounding is
//! the renderer's concern.

use serde::Serialize;

use crate::models::{Task, TaskStatus};

#[derive(Debug, Default, Clone, Serialize)]
pub struct ProgressSummary {
    pub total: i64,
    pub completed: i64,
    pub in_progress: i64,
    pub not_started: i64,
    pub deviations: i64,
}

impl ProgressSummary {
    /// Fraction of completed tasks, 0.0 for an empty snapshot.
    pub fn completion_ratio(&self) -> f64 {
        if self.total > 0 {
            self.completed as f64 / self.total as f64
        } else {
            0.0
        }
    }
}

pub fn aggregate(snapshot: &[Task]) -> ProgressSummary {
    let mut summary = ProgressSummary::default();
    for task in snapshot {
        summary.total += 1;
        match task.status {
            TaskStatus::NotStarted => summary.not_started += 1,
            TaskStatus::InProgress => summary.in_progress += 1,
            TaskStatus::Completed => summary.completed += 1,
            TaskStatus::Deviation => summary.deviations += 1,
        }
    }
    summary
}
