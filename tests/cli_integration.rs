#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        std::process::Command::new("git")
            .args(["init"])
            .current_dir(dir.path())
            .output()
            .expect("git init");
        Self { dir }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("checktrail").expect("binary");
        cmd.current_dir(self.dir.path());
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self.cmd().args(&a).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    fn add_task(&self, name: &str) -> String {
        let v = self.run_ok(&["task", "add", name]);
        v["data"]["task"]["id"].as_str().unwrap().to_string()
    }

    fn add_client_task(&self, client: &str, name: &str) -> String {
        let v = self.run_ok(&["task", "add", name, "--client", client]);
        v["data"]["task"]["id"].as_str().unwrap().to_string()
    }
}

fn setup() -> TestEnv {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env
}

// ─── 1. init ───────────────────────────────────────────────────────

#[test]
fn test_init() {
    let env = TestEnv::new();
    let v = env.run_ok(&["init"]);
    let path = v["data"]["path"].as_str().unwrap();
    assert!(path.ends_with(".checktrail/checktrail.db"));
    assert!(std::path::PathBuf::from(path).exists());
}

#[test]
fn test_init_idempotent() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_ok(&["init"]);
    assert!(v["data"]["path"].as_str().unwrap().contains("checktrail.db"));
}

#[test]
fn test_init_required_before_commands() {
    let env = TestEnv::new();
    let v = env.run_err(&["task", "list"]);
    assert_eq!(v["error"]["code"], "NOT_INITIALIZED");
}

// ─── 2. task add / show ────────────────────────────────────────────

#[test]
fn test_add_starts_not_started() {
    let env = setup();
    let v = env.run_ok(&[
        "task", "add", "Collect KYC documents",
        "--description", "Passport and proof of address",
        "--url", "https://docs.example.com/kyc",
    ]);
    let task = &v["data"]["task"];
    assert_eq!(task["status"], "not_started");
    assert_eq!(task["completed_by"], Value::Null);
    assert_eq!(task["completed_at"], Value::Null);
    assert_eq!(task["documentation_url"], "https://docs.example.com/kyc");
}

#[test]
fn test_add_rejects_empty_name() {
    let env = setup();
    let v = env.run_err(&["task", "add", "  "]);
    assert_eq!(v["error"]["code"], "MALFORMED_INPUT");
}

#[test]
fn test_show_by_prefix_and_ambiguity() {
    let env = setup();
    let id = env.add_task("Only task");
    let v = env.run_ok(&["task", "show", &id[..8]]);
    assert_eq!(v["data"]["task"]["id"], id.as_str());

    let v = env.run_err(&["task", "show", "zzz-missing"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");

    // Two more tasks; the empty-ish shared ULID prefix is ambiguous.
    env.add_task("Second");
    env.add_task("Third");
    let v = env.run_err(&["task", "show", "0"]);
    assert_eq!(v["error"]["code"], "AMBIGUOUS_REF");
}

// ─── 3. lifecycle scenarios ────────────────────────────────────────

#[test]
fn test_scenario_a_start_records_audit_entry() {
    let env = setup();
    let id = env.add_task("Review contract");
    let v = env.run_ok(&["task", "start", &id, "--actor", "alice", "--at", "2026-03-01T10:00:00Z"]);
    assert_eq!(v["data"]["task"]["status"], "in_progress");

    let v = env.run_ok(&["task", "history", &id]);
    let history = v["data"]["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["sequence"], 1);
    assert_eq!(history[0]["from_status"], "not_started");
    assert_eq!(history[0]["to_status"], "in_progress");
    assert_eq!(history[0]["actor"], "alice");
    assert!(history[0]["at"].as_str().unwrap().starts_with("2026-03-01T10:00:00"));
}

#[test]
fn test_scenario_b_completion_stamps_actor_and_time() {
    let env = setup();
    let id = env.add_task("Review contract");
    env.run_ok(&["task", "start", &id, "--actor", "alice", "--at", "2026-03-01T10:00:00Z"]);
    let v = env.run_ok(&["task", "done", &id, "--actor", "alice", "--at", "2026-03-01T11:30:00Z"]);
    let task = &v["data"]["task"];
    assert_eq!(task["status"], "completed");
    assert_eq!(task["completed_by"], "alice");
    assert!(task["completed_at"].as_str().unwrap().starts_with("2026-03-01T11:30:00"));

    let v = env.run_ok(&["task", "history", &id]);
    let history = v["data"]["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["sequence"], 2);
    assert_eq!(history[1]["from_status"], "in_progress");
    assert_eq!(history[1]["to_status"], "completed");
    assert_eq!(history[1]["actor"], "alice");
}

#[test]
fn test_scenario_c_deviation_carries_comment() {
    let env = setup();
    let id = env.add_task("Verify signatures");
    let v = env.run_ok(&[
        "task", "deviate", &id,
        "--actor", "ai-reviewer",
        "--comment", "missing signature",
    ]);
    let task = &v["data"]["task"];
    assert_eq!(task["status"], "deviation");
    assert_eq!(task["completed_by"], "ai-reviewer");
    assert_eq!(task["ai_comment"], "missing signature");
    assert!(task["completed_at"].is_string());

    let v = env.run_ok(&["task", "history", &id]);
    let history = v["data"]["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["comment"], "missing signature");
}

#[test]
fn test_scenario_d_terminal_lock() {
    let env = setup();
    let id = env.add_task("Archive file");
    env.run_ok(&["task", "done", &id, "--actor", "alice"]);
    let before = env.run_ok(&["task", "show", &id]);
    let history_before = env.run_ok(&["task", "history", &id]);

    let v = env.run_err(&["task", "deviate", &id, "--actor", "bob", "--comment", "late"]);
    assert_eq!(v["error"]["code"], "INVALID_TRANSITION");
    let v = env.run_err(&["task", "done", &id, "--actor", "bob"]);
    assert_eq!(v["error"]["code"], "INVALID_TRANSITION");
    let v = env.run_err(&["task", "start", &id, "--actor", "bob"]);
    assert_eq!(v["error"]["code"], "INVALID_TRANSITION");

    // Record and audit log unchanged.
    let after = env.run_ok(&["task", "show", &id]);
    assert_eq!(before["data"]["task"], after["data"]["task"]);
    let history_after = env.run_ok(&["task", "history", &id]);
    assert_eq!(history_before["data"]["history"], history_after["data"]["history"]);
}

#[test]
fn test_direct_completion_without_start() {
    let env = setup();
    let id = env.add_task("Quick check");
    let v = env.run_ok(&["task", "done", &id, "--actor", "carol"]);
    assert_eq!(v["data"]["task"]["status"], "completed");

    let v = env.run_ok(&["task", "history", &id]);
    let history = v["data"]["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["from_status"], "not_started");
    assert_eq!(history[0]["to_status"], "completed");
}

#[test]
fn test_in_progress_reentry_rejected() {
    let env = setup();
    let id = env.add_task("Slow task");
    env.run_ok(&["task", "start", &id, "--actor", "alice"]);
    let v = env.run_err(&["task", "start", &id, "--actor", "alice"]);
    assert_eq!(v["error"]["code"], "INVALID_TRANSITION");
}

#[test]
fn test_transition_on_missing_task() {
    let env = setup();
    let v = env.run_err(&["task", "done", "nope", "--actor", "alice"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

#[test]
fn test_empty_actor_rejected() {
    let env = setup();
    let id = env.add_task("Needs an actor");
    let v = env.run_err(&["task", "start", &id, "--actor", " "]);
    assert_eq!(v["error"]["code"], "MALFORMED_INPUT");
    // No audit entry was written.
    let v = env.run_ok(&["task", "history", &id]);
    assert_eq!(v["data"]["history"].as_array().unwrap().len(), 0);
}

#[test]
fn test_bad_timestamp_rejected() {
    let env = setup();
    let id = env.add_task("Timestamped");
    let v = env.run_err(&["task", "done", &id, "--actor", "alice", "--at", "yesterday"]);
    assert_eq!(v["error"]["code"], "MALFORMED_INPUT");
}

// ─── 4. history ────────────────────────────────────────────────────

#[test]
fn test_history_is_sequence_ordered_walk() {
    let env = setup();
    let id = env.add_task("Walked task");
    env.run_ok(&["task", "start", &id, "--actor", "alice", "--at", "2026-03-01T10:00:00Z"]);
    // Same timestamp on purpose; sequence still orders the entries.
    env.run_ok(&["task", "done", &id, "--actor", "alice", "--at", "2026-03-01T10:00:00Z"]);

    let v = env.run_ok(&["task", "history", &id]);
    let history = v["data"]["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    let mut current = "not_started".to_string();
    for (i, entry) in history.iter().enumerate() {
        assert_eq!(entry["sequence"], (i + 1) as i64);
        assert_eq!(entry["from_status"], current.as_str());
        current = entry["to_status"].as_str().unwrap().to_string();
    }
    assert_eq!(current, v["data"]["status"].as_str().unwrap());
}

#[test]
fn test_history_of_missing_task() {
    let env = setup();
    let v = env.run_err(&["task", "history", "ghost"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

// ─── 5. aggregation / status ───────────────────────────────────────

#[test]
fn test_scenario_e_aggregate_counts() {
    let env = setup();
    let mut ids = Vec::new();
    for i in 0..10 {
        ids.push(env.add_task(&format!("Task {i}")));
    }
    for id in &ids[0..4] {
        env.run_ok(&["task", "done", id, "--actor", "alice"]);
    }
    for id in &ids[4..6] {
        env.run_ok(&["task", "start", id, "--actor", "bob"]);
    }
    env.run_ok(&["task", "deviate", &ids[6], "--actor", "ai-reviewer", "--comment", "odd"]);
    // ids[7..10] stay not_started

    let v = env.run_ok(&["status"]);
    let p = &v["data"]["progress"];
    assert_eq!(p["total"], 10);
    assert_eq!(p["completed"], 4);
    assert_eq!(p["in_progress"], 2);
    assert_eq!(p["not_started"], 3);
    assert_eq!(p["deviations"], 1);
    assert!((p["completion_ratio"].as_f64().unwrap() - 0.4).abs() < 1e-9);

    let deviations = v["data"]["deviations"].as_array().unwrap();
    assert_eq!(deviations.len(), 1);
    assert_eq!(deviations[0]["id"], ids[6].as_str());
}

#[test]
fn test_status_empty_scope_has_zero_ratio() {
    let env = setup();
    let v = env.run_ok(&["status"]);
    let p = &v["data"]["progress"];
    assert_eq!(p["total"], 0);
    assert_eq!(p["completion_ratio"], 0.0);
}

#[test]
fn test_text_output_renders_progress() {
    let env = setup();
    let id = env.add_task("Readable task");
    env.run_ok(&["task", "done", &id, "--actor", "alice"]);

    env.cmd()
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress: 100.0% (1/1)"));

    env.cmd()
        .args(["task", "history", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("not_started → completed by alice"));
}

#[test]
fn test_client_scope_filters_snapshot() {
    let env = setup();
    let a1 = env.add_client_task("acme", "Acme onboarding");
    env.add_client_task("acme", "Acme review");
    env.add_client_task("globex", "Globex onboarding");
    env.run_ok(&["task", "done", &a1, "--actor", "alice"]);

    let v = env.run_ok(&["status", "--client", "acme"]);
    let p = &v["data"]["progress"];
    assert_eq!(p["total"], 2);
    assert_eq!(p["completed"], 1);

    let v = env.run_ok(&["status"]);
    assert_eq!(v["data"]["progress"]["total"], 3);

    let v = env.run_ok(&["task", "list", "--client", "globex"]);
    let tasks = v["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["client_id"], "globex");
}
