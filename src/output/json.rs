use serde_json::{json, Value};

use crate::error::ChecktrailError;
use crate::models::{AuditEntry, Task};
use crate::progress::ProgressSummary;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &ChecktrailError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn progress_json(p: &ProgressSummary) -> Value {
    json!({
        "total": p.total,
        "completed": p.completed,
        "in_progress": p.in_progress,
        "not_started": p.not_started,
        "deviations": p.deviations,
        "completion_ratio": p.completion_ratio()
    })
}

pub fn task_summary(t: &Task) -> Value {
    let mut v = json!({
        "id": t.id,
        "name": t.name,
        "status": t.status.as_str()
    });
    if let Some(ref client) = t.client_id {
        v["client_id"] = json!(client);
    }
    if let Some(ref comment) = t.ai_comment {
        v["ai_comment"] = json!(comment);
    }
    v
}

pub fn task_detail(t: &Task) -> Value {
    json!({
        "id": t.id,
        "client_id": t.client_id,
        "name": t.name,
        "description": t.description,
        "status": t.status.as_str(),
        "completed_by": t.completed_by,
        "completed_at": t.completed_at,
        "documentation_url": t.documentation_url,
        "ai_comment": t.ai_comment,
        "created_at": t.created_at,
        "updated_at": t.updated_at
    })
}

pub fn audit_entry_json(e: &AuditEntry) -> Value {
    json!({
        "task_id": e.task_id,
        "sequence": e.sequence,
        "from_status": e.from_status.as_str(),
        "to_status": e.to_status.as_str(),
        "actor": e.actor,
        "at": e.at,
        "comment": e.comment
    })
}
