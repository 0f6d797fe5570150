use rusqlite::{params, Connection};

use crate::error::ChecktrailError;
use crate::models::{AuditEntry, TaskStatus};

/// Append the next entry for a task. The sequence number is allocated here;
/// callers must hold a write transaction so allocation and insert are atomic.
pub fn append_entry(
    conn: &Connection,
    task_id: &str,
    from: TaskStatus,
    to: TaskStatus,
    actor: &str,
    at: &str,
    comment: Option<&str>,
) -> Result<i64, ChecktrailError> {
    let sequence: i64 = conn.query_row(
        "SELECT COALESCE(MAX(sequence), 0) + 1 FROM audit_log WHERE task_id = ?1",
        params![task_id],
        |row| row.get(0),
    )?;
    conn.execute(
        "INSERT INTO audit_log (task_id, sequence, from_status, to_status, actor, at, comment)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![task_id, sequence, from.as_str(), to.as_str(), actor, at, comment],
    )?;
    Ok(sequence)
}

/// Full transition history of a task, in sequence order.
pub fn history(conn: &Connection, task_id: &str) -> Result<Vec<AuditEntry>, ChecktrailError> {
    let mut stmt = conn.prepare(
        "SELECT task_id, sequence, from_status, to_status, actor, at, comment
         FROM audit_log WHERE task_id = ?1 ORDER BY sequence ASC",
    )?;
    let entries = stmt
        .query_map(params![task_id], row_to_entry)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<AuditEntry> {
    Ok(AuditEntry {
        task_id: row.get(0)?,
        sequence: row.get(1)?,
        from_status: TaskStatus::from_str(&row.get::<_, String>(2)?)
            .unwrap_or(TaskStatus::NotStarted),
        to_status: TaskStatus::from_str(&row.get::<_, String>(3)?)
            .unwrap_or(TaskStatus::NotStarted),
        actor: row.get(4)?,
        at: row.get(5)?,
        comment: row.get(6)?,
    })
}
