//! Binary smoke tests for the `taskflow` CLI.
//!
//! Each test points `TASKFLOW_DIR` at its own temp directory so runs never
//! touch the real data directory or each other.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)] // cargo_bin works fine for our use case
fn taskflow_in(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("taskflow").unwrap();
    cmd.env("TASKFLOW_DIR", data_dir)
        .env_remove("TASKFLOW_DEFAULT_PRIORITY")
        .env_remove("TASKFLOW_LOG");
    cmd
}

fn taskflow(dir: &TempDir) -> Command {
    taskflow_in(dir.path())
}

/// Run `list --json` and return the parsed task array.
fn list_json(dir: &TempDir, filter: &str) -> Vec<serde_json::Value> {
    let output = taskflow(dir)
        .args(["list", "--json", "--filter", filter])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

fn add(dir: &TempDir, args: &[&str]) {
    taskflow(dir).arg("add").args(args).assert().success();
}

fn id_of(task: &serde_json::Value) -> String {
    task["id"].as_str().unwrap().to_string()
}

// ── Version / help ──────────────────────────────────────────────────────────

#[test]
fn version_subcommand() {
    let dir = TempDir::new().unwrap();
    taskflow(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("taskflow "));
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    let output = taskflow(&dir).arg("--help").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in &[
        "add",
        "list",
        "toggle",
        "edit",
        "delete",
        "stats",
        "mood",
        "init",
        "completions",
        "version",
    ] {
        assert!(
            stdout.contains(cmd),
            "Help text should mention '{cmd}' subcommand"
        );
    }
}

// ── Init ────────────────────────────────────────────────────────────────────

#[test]
fn init_creates_and_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    taskflow_in(&data)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));
    assert!(data.is_dir());

    taskflow_in(&data)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));
}

// ── Add / list ──────────────────────────────────────────────────────────────

#[test]
fn list_empty() {
    let dir = TempDir::new().unwrap();
    taskflow(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found"));
}

#[test]
fn no_args_lists_tasks() {
    let dir = TempDir::new().unwrap();
    add(&dir, &["Buy milk"]);
    taskflow(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"));
}

#[test]
fn add_persists_task_file() {
    let dir = TempDir::new().unwrap();
    taskflow(&dir)
        .args(["add", "Buy milk", "--priority", "medium"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added: Buy milk"));

    let raw = fs::read_to_string(dir.path().join("tasks.json")).unwrap();
    let tasks: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Buy milk");
    assert_eq!(tasks[0]["priority"], "medium");
    assert_eq!(tasks[0]["completed"], false);
    assert!(tasks[0]["createdAt"].is_string());
}

#[test]
fn add_blank_title_fails_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    taskflow(&dir)
        .args(["add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be empty"));
    assert!(!dir.path().join("tasks.json").exists());
}

#[test]
fn add_rejects_unknown_priority() {
    let dir = TempDir::new().unwrap();
    taskflow(&dir)
        .args(["add", "x", "--priority", "urgent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown priority"));
}

#[test]
fn add_uses_configured_default_priority() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config"), "default_priority=low\n").unwrap();
    add(&dir, &["Water plants"]);
    assert_eq!(list_json(&dir, "all")[0]["priority"], "low");
}

#[test]
fn add_auto_priority_uses_due_date() {
    let dir = TempDir::new().unwrap();
    add(&dir, &["Pay rent", "--due", "today", "--auto-priority"]);
    add(&dir, &["Someday", "--auto-priority"]);
    let tasks = list_json(&dir, "all");
    assert_eq!(tasks[0]["priority"], "high");
    assert_eq!(tasks[1]["priority"], "low");
}

#[test]
fn add_keeps_description_and_due_date() {
    let dir = TempDir::new().unwrap();
    add(
        &dir,
        &["Report", "-d", "Q2 numbers", "--due", "2024-07-01", "-p", "high"],
    );
    let task = &list_json(&dir, "all")[0];
    assert_eq!(task["description"], "Q2 numbers");
    assert_eq!(task["dueDate"], "2024-07-01");
}

// ── Toggle / filter ─────────────────────────────────────────────────────────

#[test]
fn toggle_and_filters() {
    let dir = TempDir::new().unwrap();
    add(&dir, &["one", "-p", "high"]);
    add(&dir, &["two", "-p", "low"]);
    let one = id_of(&list_json(&dir, "all")[0]);

    taskflow(&dir)
        .args(["toggle", &one[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed: one"));

    let completed = list_json(&dir, "completed");
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0]["title"], "one");

    let pending = list_json(&dir, "pending");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["title"], "two");

    let high = list_json(&dir, "high");
    assert_eq!(high.len(), 1);
    assert_eq!(high[0]["title"], "one");

    taskflow(&dir)
        .args(["toggle", one.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reopened: one"));
    assert!(list_json(&dir, "completed").is_empty());
}

#[test]
fn debug_log_reports_config_and_prefix_resolution() {
    let dir = TempDir::new().unwrap();
    add(&dir, &["one"]);
    let id = id_of(&list_json(&dir, "all")[0]);

    taskflow(&dir)
        .env("TASKFLOW_LOG", "debug")
        .args(["toggle", &id[..8]])
        .assert()
        .success()
        .stderr(predicate::str::contains("config loaded"))
        .stderr(predicate::str::contains("resolved id prefix"));

    taskflow(&dir)
        .args(["toggle", &id[..8]])
        .assert()
        .success()
        .stderr(predicate::str::contains("resolved id prefix").not());
}

#[test]
fn toggle_unknown_id_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    add(&dir, &["one"]);
    let before = fs::read_to_string(dir.path().join("tasks.json")).unwrap();
    taskflow(&dir)
        .args(["toggle", "does-not-exist"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing changed"));
    let after = fs::read_to_string(dir.path().join("tasks.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn list_rejects_unknown_filter() {
    let dir = TempDir::new().unwrap();
    taskflow(&dir)
        .args(["list", "--filter", "done"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown filter"));
}

// ── Edit / delete ───────────────────────────────────────────────────────────

#[test]
fn edit_changes_fields_but_not_identity() {
    let dir = TempDir::new().unwrap();
    add(&dir, &["draft", "-d", "notes", "--due", "2024-01-01"]);
    let before = list_json(&dir, "all")[0].clone();
    let id = id_of(&before);

    taskflow(&dir)
        .args([
            "edit",
            id.as_str(),
            "--title",
            "final",
            "--priority",
            "low",
            "--clear-due",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated:"));

    let after = &list_json(&dir, "all")[0];
    assert_eq!(after["id"], before["id"]);
    assert_eq!(after["createdAt"], before["createdAt"]);
    assert_eq!(after["completed"], before["completed"]);
    assert_eq!(after["title"], "final");
    assert_eq!(after["priority"], "low");
    assert_eq!(after["description"], "notes");
    assert!(after.get("dueDate").is_none());
}

#[test]
fn edit_with_nothing_to_change_fails() {
    let dir = TempDir::new().unwrap();
    add(&dir, &["x"]);
    let id = id_of(&list_json(&dir, "all")[0]);
    taskflow(&dir)
        .args(["edit", id.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to change"));
}

#[test]
fn delete_twice_is_a_no_op_the_second_time() {
    let dir = TempDir::new().unwrap();
    add(&dir, &["gone"]);
    add(&dir, &["stays"]);
    let id = id_of(&list_json(&dir, "all")[0]);

    taskflow(&dir)
        .args(["delete", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted: gone"));
    taskflow(&dir)
        .args(["delete", id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing changed"));

    let tasks = list_json(&dir, "all");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "stays");
}

// ── Stats / mood ────────────────────────────────────────────────────────────

#[test]
fn stats_reach_level_two_after_ten_completions() {
    let dir = TempDir::new().unwrap();
    for i in 0..10 {
        add(&dir, &[format!("task {i}").as_str()]);
    }
    for task in list_json(&dir, "all") {
        taskflow(&dir).args(["toggle", id_of(&task).as_str()]).assert().success();
    }

    let output = taskflow(&dir).args(["stats", "--json"]).output().unwrap();
    assert!(output.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["totalTasks"], 10);
    assert_eq!(stats["tasksCompleted"], 10);
    assert_eq!(stats["points"], 100);
    assert_eq!(stats["level"], 2);
    assert_eq!(stats["completionRate"], 100);
    assert_eq!(stats["completedByPriority"]["medium"], 10);

    taskflow(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Level 2"));
}

#[test]
fn mood_set_show_and_clear() {
    let dir = TempDir::new().unwrap();
    taskflow(&dir)
        .arg("mood")
        .assert()
        .success()
        .stdout(predicate::str::contains("No mood set"));

    taskflow(&dir)
        .args(["mood", "focused"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mood set: Focused"));
    assert_eq!(
        fs::read_to_string(dir.path().join("mood.json")).unwrap(),
        "\"focused\""
    );
    assert!(!dir.path().join("tasks.json").exists());

    taskflow(&dir)
        .arg("mood")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mood: Focused"));

    taskflow(&dir).args(["mood", "--clear"]).assert().success();
    assert!(!dir.path().join("mood.json").exists());
}

#[test]
fn corrupt_task_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tasks.json"), "{ definitely not json").unwrap();
    taskflow(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found"));
}

// ── Completions ─────────────────────────────────────────────────────────────

#[test]
fn completions_bash() {
    let dir = TempDir::new().unwrap();
    taskflow(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("taskflow"));
}

#[test]
fn completions_unknown_shell_fails() {
    let dir = TempDir::new().unwrap();
    taskflow(&dir)
        .args(["completions", "tcsh"])
        .assert()
        .failure();
}
