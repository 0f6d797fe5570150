//! Transition engine: the only writer of task records and the audit log.
//!
//! Every operation resolves the task, validates the requested transition
//! against the current status, then updates the record and appends the
//! audit entry in one transaction. Readers observe either the pre- or the
//! post-transition state, never a record without its audit entry.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::db::{audit_repo, task_repo};
use crate::error::ChecktrailError;
use crate::models::{Task, TaskStatus};

/// Move a task from `not_started` to `in_progress`.
///
/// Re-entry from `in_progress` is rejected, not silently accepted: a caller
/// that retries must re-fetch the current status first.
pub fn mark_in_progress(
    conn: &Connection,
    task_ref: &str,
    actor: &str,
    at: DateTime<Utc>,
) -> Result<Task, ChecktrailError> {
    transition(conn, task_ref, actor, at, TaskStatus::InProgress, None)
}

/// Complete a task. Allowed from `not_started` or `in_progress`; stamps
/// `completed_by` and `completed_at`.
pub fn request_completion(
    conn: &Connection,
    task_ref: &str,
    actor: &str,
    at: DateTime<Utc>,
) -> Result<Task, ChecktrailError> {
    transition(conn, task_ref, actor, at, TaskStatus::Completed, None)
}

/// Flag a task as deviating from expected procedure. Terminal like
/// completion; the comment lands on the record as `ai_comment` and on the
/// audit entry. A deviation without a comment is legal but unexplained.
pub fn flag_deviation(
    conn: &Connection,
    task_ref: &str,
    actor: &str,
    at: DateTime<Utc>,
    comment: Option<&str>,
) -> Result<Task, ChecktrailError> {
    transition(conn, task_ref, actor, at, TaskStatus::Deviation, comment)
}

fn transition(
    conn: &Connection,
    task_ref: &str,
    actor: &str,
    at: DateTime<Utc>,
    to: TaskStatus,
    comment: Option<&str>,
) -> Result<Task, ChecktrailError> {
    if actor.trim().is_empty() {
        return Err(ChecktrailError::malformed_input(
            "An actor is required for every transition",
        ));
    }

    let at = at.to_rfc3339();

    // The write lock must cover read, validation, and both writes: a status
    // read taken before the lock could be stale by the time we hold it.
    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = (|| -> Result<String, ChecktrailError> {
        let task = task_repo::resolve_task(conn, task_ref)?;
        if !task.status.can_transition_to(to) {
            return Err(ChecktrailError::invalid_transition(
                task.status.as_str(),
                to.as_str(),
            ));
        }
        task_repo::apply_transition(conn, &task.id, to, actor, &at, comment)?;
        audit_repo::append_entry(conn, &task.id, task.status, to, actor, &at, comment)?;
        Ok(task.id)
    })();

    match result {
        Ok(id) => {
            conn.execute_batch("COMMIT")?;
            task_repo::get_task_by_id(conn, &id)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

/// Create a task record in its initial `not_started` state.
pub fn create_task(
    conn: &Connection,
    client_id: Option<&str>,
    name: &str,
    description: Option<&str>,
    documentation_url: Option<&str>,
) -> Result<Task, ChecktrailError> {
    if name.trim().is_empty() {
        return Err(ChecktrailError::malformed_input("Task name is required"));
    }
    let id = ulid::Ulid::new().to_string();
    task_repo::create_task(conn, &id, client_id, name, description, documentation_url)
}
