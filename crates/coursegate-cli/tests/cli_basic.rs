//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "coursegate-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn test_redirect_same_part_prints_nothing() {
    let (stdout, _, code) = run_cli(&["redirect", "UK", "5", "part", "--show-part", "5"]);
    assert_eq!(code, 0, "redirect failed");
    assert!(stdout.trim().is_empty());
}

#[test]
fn test_redirect_under_mount_point() {
    let (stdout, _, code) = run_cli(&[
        "redirect",
        "UK Agent",
        "6",
        "quiz",
        "--show-part",
        "5",
        "--path",
        "/counselor_project/fetch_current_part/UK%20Agent/5/1/",
    ]);
    assert_eq!(code, 0, "redirect failed");
    assert_eq!(
        stdout.trim(),
        "/counselor_project/fetch_current_part/UK%20Agent/6/0/"
    );
}

#[test]
fn test_redirect_rejects_unknown_view() {
    let (_, _, code) = run_cli(&["redirect", "UK", "6", "video", "--show-part", "5"]);
    assert_ne!(code, 0);
}

#[test]
fn test_validate_blocked_form() {
    let dir = tempfile::tempdir().unwrap();
    let form = dir.path().join("form.json");
    std::fs::write(
        &form,
        r#"{"controls": [
            {"name": "q1", "kind": "radio", "value": "a", "checked": true},
            {"name": "q2", "kind": "radio", "value": "a", "checked": false},
            {"name": "q3", "kind": "radio", "value": "b", "checked": true}
        ]}"#,
    )
    .unwrap();

    let (stdout, stderr, code) = run_cli(&["validate", "--form", path_str(&form)]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Please select an option for all questions"));

    let decision: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(decision["decision"], "blocked");
    assert_eq!(decision["unanswered"], serde_json::json!(["q2"]));

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&form).unwrap()).unwrap();
    assert_eq!(saved["marked"], serde_json::json!(["q2"]));
}

#[test]
fn test_validate_allowed_form() {
    let dir = tempfile::tempdir().unwrap();
    let form = dir.path().join("form.json");
    std::fs::write(
        &form,
        r#"{"controls": [{"name": "q1", "kind": "radio", "value": "a", "checked": true}]}"#,
    )
    .unwrap();

    let (stdout, _, code) = run_cli(&["validate", "--form", path_str(&form)]);
    assert_eq!(code, 0);
    assert!(stdout.contains("allow"));
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let config = path_str(&config);

    let (stdout, _, code) = run_cli(&["--config", config, "config", "get", "countdown.unlock_delay_secs"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "300");

    let (_, _, code) = run_cli(&["--config", config, "config", "set", "server.course_name", "UK"]);
    assert_eq!(code, 0);

    let (stdout, _, _) = run_cli(&["--config", config, "config", "get", "server.course_name"]);
    assert_eq!(stdout.trim(), "UK");

    let (_, stderr, code) = run_cli(&["--config", config, "config", "get", "server.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_countdown_unlocks_elapsed_button() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let page = dir.path().join("page.json");
    std::fs::write(
        &page,
        r#"{
            "location": "/fetch_current_part/UK/3/1/",
            "retry_buttons": [{
                "id": "retry-3",
                "attributes": {
                    "data-window-closed-time": "2020-01-01T00:00:00+00:00",
                    "data-part-id": "3"
                },
                "disabled": true,
                "classes": ["btn", "disabled"],
                "label": "Locked"
            }],
            "countdown_targets": {"countdown-3": ""}
        }"#,
    )
    .unwrap();

    let (stdout, _, code) = run_cli(&[
        "--config",
        path_str(&config),
        "countdown",
        "--page",
        path_str(&page),
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("retry-3: Last attempt"));

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&page).unwrap()).unwrap();
    assert_eq!(saved["retry_buttons"][0]["disabled"], false);
    assert_eq!(saved["retry_buttons"][0]["classes"], serde_json::json!(["btn"]));
}

#[test]
fn test_complete_unknown_part_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let page = dir.path().join("page.json");
    std::fs::write(&page, r#"{"location": "/"}"#).unwrap();

    let (_, stderr, code) = run_cli(&[
        "--config",
        path_str(&config),
        "complete",
        "42",
        "--page",
        path_str(&page),
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown part: 42"));
}
