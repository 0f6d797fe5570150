use rusqlite::{params, Connection};

use crate::error::ChecktrailError;
use crate::models::{Scope, Task, TaskStatus};

const TASK_COLUMNS: &str = "id, client_id, name, description, status, completed_by, completed_at,
                documentation_url, ai_comment, created_at, updated_at";

pub fn create_task(
    conn: &Connection,
    id: &str,
    client_id: Option<&str>,
    name: &str,
    description: Option<&str>,
    documentation_url: Option<&str>,
) -> Result<Task, ChecktrailError> {
    conn.execute(
        "INSERT INTO tasks (id, client_id, name, description, documentation_url)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, client_id, name, description, documentation_url],
    )?;
    get_task_by_id(conn, id)
}

pub fn get_task_by_id(conn: &Connection, id: &str) -> Result<Task, ChecktrailError> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => ChecktrailError::task_not_found(id),
        _ => ChecktrailError::from(e),
    })
}

/// Resolve a task by exact ID or unique ID prefix.
pub fn resolve_task(conn: &Connection, reference: &str) -> Result<Task, ChecktrailError> {
    if reference.trim().is_empty() {
        return Err(ChecktrailError::malformed_input("Task reference is required"));
    }

    // Exact ID match first
    if let Ok(task) = get_task_by_id(conn, reference) {
        return Ok(task);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id LIKE ?1"
    ))?;
    let prefix = format!("{reference}%");
    let tasks: Vec<Task> = stmt
        .query_map(params![prefix], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;

    match tasks.len() {
        0 => Err(ChecktrailError::task_not_found(reference)),
        1 => Ok(tasks.into_iter().next().unwrap()),
        _ => {
            let candidates: Vec<String> =
                tasks.iter().map(|t| format!("{} ({})", t.name, t.id)).collect();
            Err(ChecktrailError::ambiguous_ref(reference, &candidates))
        }
    }
}

/// Snapshot of task records for a scope, in creation order.
pub fn list_tasks(conn: &Connection, scope: &Scope) -> Result<Vec<Task>, ChecktrailError> {
    let (sql, client) = match scope {
        Scope::All => (
            format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at ASC, id ASC"),
            None,
        ),
        Scope::Client(c) => (
            format!(
                "SELECT {TASK_COLUMNS} FROM tasks WHERE client_id = ?1
                 ORDER BY created_at ASC, id ASC"
            ),
            Some(c.as_str()),
        ),
    };
    let mut stmt = conn.prepare(&sql)?;
    let tasks = match client {
        Some(c) => stmt
            .query_map(params![c], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?,
        None => stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?,
    };
    Ok(tasks)
}

/// Record-side write of one validated transition. The engine is the only
/// caller, always inside a transaction with the matching audit append.
pub fn apply_transition(
    conn: &Connection,
    id: &str,
    to: TaskStatus,
    actor: &str,
    at: &str,
    ai_comment: Option<&str>,
) -> Result<(), ChecktrailError> {
    // The transition timestamp is authoritative for every stamp it touches.
    if to.is_terminal() {
        conn.execute(
            "UPDATE tasks SET status = ?1, completed_by = ?2, completed_at = ?3,
                 ai_comment = COALESCE(?4, ai_comment),
                 updated_at = ?3
             WHERE id = ?5",
            params![to.as_str(), actor, at, ai_comment, id],
        )?;
    } else {
        conn.execute(
            "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![to.as_str(), at, id],
        )?;
    }
    Ok(())
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        client_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        status: TaskStatus::from_str(&row.get::<_, String>(4)?).unwrap_or(TaskStatus::NotStarted),
        completed_by: row.get(5)?,
        completed_at: row.get(6)?,
        documentation_url: row.get(7)?,
        ai_comment: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}
