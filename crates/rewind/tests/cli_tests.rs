//! CLI integration tests.
//!
//! These tests run the rewind binary end-to-end over its stdin/stdout protocol.

use rewind_test_utils::assertions::{assert_file_equals, assert_file_missing};
use rewind_test_utils::TestProject;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn rewind(cwd: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rewind"));
    cmd.current_dir(cwd)
        // Keep any user config out of the tests
        .env("XDG_CONFIG_HOME", cwd.join(".config"))
        .env_remove("REWIND_UNDO_ENABLED")
        .env_remove("REWIND_UNDO_MAX_OPERATIONS")
        .env_remove("RUST_LOG");
    cmd
}

fn serve(cwd: &Path, extra_args: &[&str], requests: &[Value]) -> (Output, Vec<Value>) {
    let mut child = rewind(cwd)
        .arg("serve")
        .args(extra_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn rewind");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        for request in requests {
            writeln!(stdin, "{}", request).expect("write request");
        }
    }
    drop(child.stdin.take());

    let output = child.wait_with_output().expect("wait for rewind");
    let responses = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("response is JSON"))
        .collect();
    (output, responses)
}

#[test]
fn test_help_command() {
    let project = TestProject::new().build();
    let output = rewind(project.path())
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("undo history"));
    assert!(stdout.contains("--disable-undo"));
    assert!(stdout.contains("--max-undo-operations"));
}

#[test]
fn test_tools_command() {
    let project = TestProject::new().build();
    let output = rewind(project.path())
        .arg("tools")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for tool in ["write", "edit", "multiedit", "undo"] {
        assert!(stdout.lines().any(|line| line == tool), "missing {tool}");
    }
}

#[test]
fn test_config_command_applies_flags() {
    let project = TestProject::new()
        .with_config(r#"{ "maxOperationsPerFile": 4 }"#)
        .build();
    let output = rewind(project.path())
        .args(["--config", "rewind.json", "--disable-undo", "config"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["history"]["enabled"], false);
    assert_eq!(config["history"]["maxOperationsPerFile"], 4);
}

#[test]
fn test_invalid_env_config_fails() {
    let project = TestProject::new().build();
    let output = rewind(project.path())
        .env("REWIND_UNDO_MAX_OPERATIONS", "zero")
        .arg("config")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_invalid_log_level_fails() {
    let project = TestProject::new().build();
    let output = rewind(project.path())
        .args(["--log-level", "loud", "config"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid log level"));
}

#[test]
fn test_serve_edit_and_undo() {
    let project = TestProject::new()
        .with_file("notes.txt", "Hello, World!")
        .build();
    let file = project.file("notes.txt");
    let path = file.to_str().unwrap();

    let (output, responses) = serve(
        project.path(),
        &[],
        &[
            json!({"id": 1, "tool": "edit", "args": {"filePath": path, "oldString": "World", "newString": "Rust"}}),
            json!({"id": 2, "tool": "undo", "args": {"filePath": path, "listHistory": true}}),
            json!({"id": 3, "tool": "undo", "args": {"filePath": path}}),
            json!({"id": 4, "tool": "undo", "args": {"filePath": path}}),
        ],
    );

    assert!(output.status.success());
    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0]["ok"], true);
    assert!(responses[1]["output"]
        .as_str()
        .unwrap()
        .contains("Edited file (1 replacement)"));
    assert_eq!(responses[2]["ok"], true);
    assert_eq!(responses[3]["ok"], false);
    assert_eq!(
        responses[3]["error"],
        format!("No undo operations available for: {}", path)
    );
    assert_file_equals(&file, "Hello, World!");
}

#[test]
fn test_serve_with_undo_disabled() {
    let project = TestProject::new().build();
    let file = project.file("new.txt");
    let path = file.to_str().unwrap();

    let (_, responses) = serve(
        project.path(),
        &["--disable-undo"],
        &[
            json!({"id": 1, "tool": "write", "args": {"filePath": path, "content": "x"}}),
            json!({"id": 2, "tool": "undo", "args": {"filePath": path}}),
        ],
    );

    assert_eq!(responses[0]["ok"], true);
    assert_eq!(responses[1]["error"], "Undo functionality is disabled");
    assert_file_equals(&file, "x");
}

#[test]
fn test_serve_rejects_paths_outside_allowed_roots() {
    let project = TestProject::new().with_dir("inside").build();
    let outside = project.file("outside.txt");

    let (_, responses) = serve(
        project.path(),
        &["--allow", "inside"],
        &[json!({"id": 1, "tool": "write", "args": {"filePath": outside.to_str().unwrap(), "content": "x"}})],
    );

    assert_eq!(responses[0]["ok"], false);
    assert!(responses[0]["error"]
        .as_str()
        .unwrap()
        .starts_with("Access denied"));
    assert_file_missing(&outside);
}
