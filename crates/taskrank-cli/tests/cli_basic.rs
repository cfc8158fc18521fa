//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a temp dir and verify outputs.

use std::path::Path;
use std::process::Command;

const SNAPSHOT: &str = r#"{
    "users": [{"id": 1, "username": "ana"}],
    "categories": [{"id": 5, "userId": 1, "name": "Home"}],
    "tasks": [
        {"id": 1, "userId": 1, "title": "Plain"},
        {"id": 2, "userId": 1, "title": "Quick fun", "categoryId": 5,
         "fun": "high", "difficulty": "low", "time": "short"},
        {"id": 3, "userId": 1, "title": "Pinned", "isPinned": true, "fun": "low"},
        {"id": 4, "userId": 1, "title": "Overdue", "deadline": "2025-01-01T00:00:00Z"}
    ]
}"#;

const NOW: &str = "2025-01-10T00:00:00Z";

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_taskrank"))
        .args(args)
        .env("HOME", home)
        .env_remove("TASKRANK_ENV")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn setup() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, SNAPSHOT).unwrap();
    let path = path.to_string_lossy().to_string();
    (dir, path)
}

#[test]
fn test_rank_json() {
    let (dir, snapshot) = setup();
    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &["rank", "--user", "ana", "--snapshot", &snapshot, "--now", NOW, "--json"],
    );
    assert_eq!(code, 0, "rank failed: {stderr}");

    let ranked: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let ids: Vec<&str> = ranked
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    // Pinned first; then 4: 200 + 100, 2: 100 + 67 + 66 + 67 = 300, 1: 200.
    assert_eq!(ids, vec!["3", "4", "2", "1"]);
    assert_eq!(ranked[1]["priorityScore"], 300.0);
    assert_eq!(ranked[2]["priorityScore"], 300.0);
}

#[test]
fn test_rank_table_and_category() {
    let (dir, snapshot) = setup();
    let (stdout, _, code) = run_cli(
        dir.path(),
        &["rank", "-u", "1", "--snapshot", &snapshot, "--now", NOW, "--category", "home"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Quick fun [2]"));
    assert!(!stdout.contains("Plain"));
}

#[test]
fn test_rank_unknown_user_fails() {
    let (dir, snapshot) = setup();
    let (_, stderr, code) = run_cli(dir.path(), &["rank", "--user", "zed", "--snapshot", &snapshot]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_explain() {
    let (dir, snapshot) = setup();
    let (stdout, _, code) = run_cli(
        dir.path(),
        &["explain", "4", "--user", "ana", "--snapshot", &snapshot, "--now", NOW, "--json"],
    );
    assert_eq!(code, 0);
    let breakdown: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(breakdown["total"], 300.0);
    assert_eq!(breakdown["urgency"], 100.0);
}

#[test]
fn test_prefs_set_validates_and_persists() {
    let (dir, snapshot) = setup();
    let (_, _, code) = run_cli(
        dir.path(),
        &["prefs", "set", "--user", "ana", "--snapshot", &snapshot, "--fun", "2.5"],
    );
    assert_ne!(code, 0, "out-of-range weight must be rejected");

    let (_, stderr, code) = run_cli(
        dir.path(),
        &["prefs", "set", "--user", "ana", "--snapshot", &snapshot, "--deadline", "0.5"],
    );
    assert_eq!(code, 0, "prefs set failed: {stderr}");

    let (stdout, _, code) = run_cli(dir.path(), &["prefs", "show", "--user", "ana", "--snapshot", &snapshot]);
    assert_eq!(code, 0);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["stored"], true);
    assert_eq!(report["deadlineInfluence"], 0.5);
    assert_eq!(report["funInfluence"], 1.0);
}

#[test]
fn test_config_set_and_get() {
    let (dir, _) = setup();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["config", "set", "ranking.default_preferences.funInfluence", "1.5"],
    );
    assert_eq!(code, 0, "config set failed: {stderr}");

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "ranking.default_preferences.funInfluence"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "1.5");

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_ne!(code, 0);

    let (_, stderr, code) = run_cli(
        dir.path(),
        &["config", "set", "ranking.default_preferences.funInfluence", "5"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("funInfluence"));
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "ranking.default_preferences.funInfluence"]);
    assert_eq!(stdout.trim(), "1.5");
}
