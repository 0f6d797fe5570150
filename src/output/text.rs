use crate::models::{AuditEntry, Task};
use crate::progress::ProgressSummary;

pub fn print_task(t: &Task) {
    println!("Task: {} ({})", t.name, t.id);
    if let Some(ref client) = t.client_id {
        println!("  Client: {client}");
    }
    if let Some(ref desc) = t.description {
        println!("  Description: {desc}");
    }
    println!("  Status: {}", t.status.as_str());
    if let Some(ref by) = t.completed_by {
        println!("  Completed by: {by}");
    }
    if let Some(ref at) = t.completed_at {
        println!("  Completed at: {at}");
    }
    if let Some(ref url) = t.documentation_url {
        println!("  Documentation: {url}");
    }
    if let Some(ref comment) = t.ai_comment {
        println!("  Reviewer comment: {comment}");
    }
}

pub fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for t in tasks {
        let client = t.client_id.as_deref().unwrap_or("");
        println!(
            "  [{}] {} ({}) {}",
            t.status.as_str(),
            t.name,
            &t.id[..std::cmp::min(8, t.id.len())],
            if client.is_empty() { String::new() } else { format!("@{client}") }
        );
    }
}

pub fn print_progress(p: &ProgressSummary) {
    // Display rounding only; the summary itself carries the raw ratio.
    println!(
        "Progress: {:.1}% ({}/{})",
        p.completion_ratio() * 100.0,
        p.completed,
        p.total
    );
    println!(
        "  not_started={} in_progress={} completed={} deviations={}",
        p.not_started, p.in_progress, p.completed, p.deviations
    );
}

pub fn print_history(entries: &[AuditEntry]) {
    if entries.is_empty() {
        println!("No transitions recorded.");
        return;
    }
    for e in entries {
        let comment = e
            .comment
            .as_deref()
            .map(|c| format!(" — {c}"))
            .unwrap_or_default();
        println!(
            "  #{} {} → {} by {} at {}{}",
            e.sequence,
            e.from_status.as_str(),
            e.to_status.as_str(),
            e.actor,
            e.at,
            comment
        );
    }
}
