use std::env;
use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;

use crate::error::{ChecktrailError, ErrorCode};

use super::migrations;

/// The database lives under the repository root so that a checklist travels
/// with the repo it documents. Walks up from the current directory until a
/// `.git` entry is found.
pub fn repo_root() -> Result<PathBuf, ChecktrailError> {
    let mut dir = env::current_dir().map_err(|e| ChecktrailError::database(e.to_string()))?;
    while !dir.join(".git").exists() {
        if !dir.pop() {
            return Err(ChecktrailError::new(
                ErrorCode::NotInitialized,
                "No git repository found in this directory or any parent.",
            ));
        }
    }
    Ok(dir)
}

pub fn db_path() -> Result<PathBuf, ChecktrailError> {
    Ok(repo_root()?.join(".checktrail").join("checktrail.db"))
}

/// Open the existing database; `init` must have run first.
pub fn open_db() -> Result<Connection, ChecktrailError> {
    let path = db_path()?;
    if !path.exists() {
        return Err(ChecktrailError::not_initialized());
    }
    open_at(&path)
}

/// Create the database directory and schema. Safe to run repeatedly.
pub fn init_db() -> Result<PathBuf, ChecktrailError> {
    let path = db_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ChecktrailError::database(e.to_string()))?;
    }
    let conn = open_at(&path)?;
    migrations::run_migrations(&conn)?;
    Ok(path)
}

fn open_at(path: &PathBuf) -> Result<Connection, ChecktrailError> {
    let conn = Connection::open(path)?;
    // WAL keeps readers off the writer's lock; busy_timeout makes competing
    // writers queue instead of failing immediately.
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(conn)
}
