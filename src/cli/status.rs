use serde_json::json;

use crate::db::{connection, task_repo};
use crate::error::ChecktrailError;
use crate::models::{Scope, TaskStatus};
use crate::output;
use crate::progress;

pub fn run(json_output: bool, client_flag: Option<&str>) -> i32 {
    let result = run_inner(json_output, client_flag);
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

fn run_inner(json_output: bool, client_flag: Option<&str>) -> Result<i32, ChecktrailError> {
    let conn = connection::open_db()?;
    let scope = Scope::from_flag(client_flag);
    let tasks = task_repo::list_tasks(&conn, &scope)?;
    let summary = progress::aggregate(&tasks);

    if json_output {
        let deviations: Vec<_> = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Deviation)
            .map(output::json::task_summary)
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "scope": client_flag.unwrap_or("all"),
                "progress": output::json::progress_json(&summary),
                "deviations": deviations
            })))
            .unwrap()
        );
    } else {
        match client_flag {
            Some(c) => println!("Scope: client {c}"),
            None => println!("Scope: all clients"),
        }
        output::text::print_progress(&summary);
        let flagged: Vec<_> = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Deviation)
            .collect();
        if !flagged.is_empty() {
            println!("\nDeviations:");
            for t in flagged {
                let comment = t.ai_comment.as_deref().unwrap_or("no comment");
                println!("  {} - {} ({comment})", t.id, t.name);
            }
        }
    }
    Ok(0)
}
