use chrono::{DateTime, Utc};
use serde_json::json;

use crate::cli::commands::TaskCommands;
use crate::db::{audit_repo, connection, task_repo};
use crate::engine;
use crate::error::ChecktrailError;
use crate::models::{Scope, Task};
use crate::output;
use crate::progress;

pub fn run(cmd: TaskCommands, json_output: bool, client_flag: Option<&str>) -> i32 {
    let result = match cmd {
        TaskCommands::Add { name, description, url } => {
            run_add(&name, description.as_deref(), url.as_deref(), json_output, client_flag)
        }
        TaskCommands::List => run_list(json_output, client_flag),
        TaskCommands::Show { id } => run_show(&id, json_output),
        TaskCommands::Start { id, actor, at } => {
            run_transition(&id, "start", &actor, at.as_deref(), None, json_output)
        }
        TaskCommands::Done { id, actor, at } => {
            run_transition(&id, "done", &actor, at.as_deref(), None, json_output)
        }
        TaskCommands::Deviate { id, actor, comment, at } => {
            run_transition(&id, "deviate", &actor, at.as_deref(), comment.as_deref(), json_output)
        }
        TaskCommands::History { id } => run_history(&id, json_output),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output::json::error(&e)).unwrap()
                );
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}

fn run_add(
    name: &str,
    description: Option<&str>,
    url: Option<&str>,
    json_output: bool,
    client_flag: Option<&str>,
) -> Result<i32, ChecktrailError> {
    let conn = connection::open_db()?;
    let task = engine::create_task(&conn, client_flag, name, description, url)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_detail(&task)
            })))
            .unwrap()
        );
    } else {
        println!("Added task: {} ({})", task.name, task.id);
    }
    Ok(0)
}

fn run_list(json_output: bool, client_flag: Option<&str>) -> Result<i32, ChecktrailError> {
    let conn = connection::open_db()?;
    let scope = Scope::from_flag(client_flag);
    let tasks = task_repo::list_tasks(&conn, &scope)?;
    let summary = progress::aggregate(&tasks);

    if json_output {
        let tasks_json: Vec<_> = tasks.iter().map(output::json::task_summary).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "tasks": tasks_json,
                "progress": output::json::progress_json(&summary)
            })))
            .unwrap()
        );
    } else {
        output::text::print_task_list(&tasks);
        println!();
        output::text::print_progress(&summary);
    }
    Ok(0)
}

fn run_show(id: &str, json_output: bool) -> Result<i32, ChecktrailError> {
    let conn = connection::open_db()?;
    let task = task_repo::resolve_task(&conn, id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_detail(&task)
            })))
            .unwrap()
        );
    } else {
        output::text::print_task(&task);
    }
    Ok(0)
}

fn run_transition(
    id: &str,
    action: &str,
    actor: &str,
    at: Option<&str>,
    comment: Option<&str>,
    json_output: bool,
) -> Result<i32, ChecktrailError> {
    let conn = connection::open_db()?;
    let at = parse_timestamp(at)?;

    let task = match action {
        "start" => engine::mark_in_progress(&conn, id, actor, at)?,
        "done" => engine::request_completion(&conn, id, actor, at)?,
        "deviate" => engine::flag_deviation(&conn, id, actor, at, comment)?,
        _ => unreachable!("unknown transition action"),
    };

    print_transition_result(&conn, &task, json_output)?;
    Ok(0)
}

fn parse_timestamp(at: Option<&str>) -> Result<DateTime<Utc>, ChecktrailError> {
    match at {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                ChecktrailError::malformed_input(format!("Invalid --at timestamp '{s}': {e}"))
            }),
        None => Ok(Utc::now()),
    }
}

fn print_transition_result(
    conn: &rusqlite::Connection,
    task: &Task,
    json_output: bool,
) -> Result<(), ChecktrailError> {
    if json_output {
        let log = audit_repo::history(conn, &task.id)?;
        let last = log.last().map(output::json::audit_entry_json);
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_detail(task),
                "audit_entry": last
            })))
            .unwrap()
        );
    } else {
        println!("Task {} → {}", task.id, task.status.as_str());
    }
    Ok(())
}

fn run_history(id: &str, json_output: bool) -> Result<i32, ChecktrailError> {
    let conn = connection::open_db()?;
    let task = task_repo::resolve_task(&conn, id)?;
    let entries = audit_repo::history(&conn, &task.id)?;

    if json_output {
        let entries_json: Vec<_> = entries.iter().map(output::json::audit_entry_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task_id": task.id,
                "status": task.status.as_str(),
                "history": entries_json
            })))
            .unwrap()
        );
    } else {
        println!("History for {} ({}):", task.name, task.id);
        output::text::print_history(&entries);
    }
    Ok(0)
}
