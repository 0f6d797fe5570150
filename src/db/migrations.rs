use rusqlite::Connection;

use crate::error::ChecktrailError;

pub fn run_migrations(conn: &Connection) -> Result<(), ChecktrailError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            client_id TEXT,
            name TEXT NOT NULL CHECK (length(name) > 0),
            description TEXT,
            status TEXT NOT NULL DEFAULT 'not_started'
                CHECK (status IN ('not_started', 'in_progress', 'completed', 'deviation')),
            completed_by TEXT,
            completed_at TEXT,
            documentation_url TEXT,
            ai_comment TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            CHECK ((completed_by IS NULL) = (completed_at IS NULL)),
            CHECK ((completed_at IS NOT NULL) = (status IN ('completed', 'deviation')))
        );

        CREATE TABLE IF NOT EXISTS audit_log (
            task_id TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            sequence INTEGER NOT NULL CHECK (sequence >= 1),
            from_status TEXT NOT NULL,
            to_status TEXT NOT NULL,
            actor TEXT NOT NULL,
            at TEXT NOT NULL,
            comment TEXT,
            PRIMARY KEY (task_id, sequence)
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_client_status ON tasks(client_id, status);
        CREATE INDEX IF NOT EXISTS idx_audit_task ON audit_log(task_id, sequence);
        ",
    )?;
    Ok(())
}
