//! CLI integration tests
//!
//! These tests run the compiled binary and check:
//! - Command parsing and usage errors
//! - Detection output on stdout
//! - Settings written by `generate`
//! - Exit codes

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A command for the binary with an empty `PATH`, so no shell tool resolves.
fn guardian(empty_path: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_permission-guardian"));
    cmd.env("PATH", empty_path)
        .env_remove("RUST_LOG")
        .env_remove("GUARDIAN_SETTINGS_PATH")
        .env_remove("GUARDIAN_LOG_LEVEL")
        .env_remove("GUARDIAN_LOG_JSON");
    cmd
}

fn run(args: &[&str]) -> (Output, TempDir) {
    let no_tools = TempDir::new().expect("Failed to create temp dir");
    let output = guardian(no_tools.path())
        .args(args)
        .output()
        .expect("Failed to execute permission-guardian");
    (output, no_tools)
}

fn create_project(files: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for file in files {
        let path = dir.path().join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent");
        }
        fs::write(&path, "").expect("Failed to write indicator");
    }
    dir
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("Non-UTF-8 temp path")
}

fn read_settings(path: &PathBuf) -> Value {
    let text = fs::read_to_string(path).expect("Settings file missing");
    serde_json::from_str(&text).expect("Settings file is not JSON")
}

#[test]
fn test_cli_help() {
    let (output, _guard) = run(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("permission-guardian"));
    assert!(stdout.contains("detect"));
    assert!(stdout.contains("generate"));
}

#[test]
fn test_cli_version() {
    let (output, _guard) = run(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_subcommand_exits_one() {
    let (output, _guard) = run(&["frobnicate"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_generate_without_mode_exits_one() {
    let project = create_project(&[]);
    let (output, _guard) = run(&["generate", path_str(project.path())]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!project.path().join(".claude").exists());
}

#[test]
fn test_detect_missing_directory() {
    let (output, _guard) = run(&["detect", "/nonexistent/project/path"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"));
}

#[test]
fn test_detect_file_instead_of_directory() {
    let project = create_project(&["package.json"]);
    let file = project.path().join("package.json");
    let (output, _guard) = run(&["detect", path_str(&file)]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a directory"));
}

#[test]
fn test_detect_json_output() {
    let project = create_project(&["package.json", "go.mod"]);
    let (output, _guard) = run(&["detect", path_str(project.path())]);

    assert!(output.status.success());
    let json: Value =
        serde_json::from_slice(&output.stdout).expect("detect should print JSON on stdout");
    let obj = json.as_object().expect("Expected a JSON object");

    let keys: Vec<&String> = obj.keys().collect();
    assert_eq!(keys, vec!["node", "go"]);

    assert_eq!(json["node"]["detected"], true);
    assert_eq!(json["node"]["indicators"][0], "package.json");
    assert_eq!(json["node"]["confidence"], 0.2);
    assert_eq!(json["go"]["confidence"], 0.5);
    assert!(obj.get("shell-tools").is_none());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Tech Stack Detection Summary"));
}

#[test]
fn test_detect_empty_project() {
    let project = create_project(&[]);
    let (output, _guard) = run(&["detect", path_str(project.path())]);

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json, serde_json::json!({}));
}

#[test]
fn test_detect_human_format() {
    let project = create_project(&["Cargo.toml"]);
    let (output, _guard) = run(&["detect", path_str(project.path()), "--format", "human"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rust: Cargo.toml"));
}

#[test]
fn test_generate_stacks_merges_existing_settings() {
    let project = create_project(&[]);
    let settings = project.path().join(".claude/settings.json");
    fs::create_dir_all(settings.parent().unwrap()).unwrap();
    fs::write(
        &settings,
        r#"{"model": "opus", "permissions": {"allow": ["Bash(git status)"], "defaultMode": "plan"}}"#,
    )
    .unwrap();

    let (output, _guard) = run(&["generate", path_str(project.path()), "--stacks", "git", "-q"]);
    assert!(output.status.success());

    let json = read_settings(&settings);
    assert_eq!(json["model"], "opus");
    assert_eq!(json["permissions"]["defaultMode"], "plan");

    let allow = json["permissions"]["allow"].as_array().unwrap();
    assert_eq!(allow[0], "Bash(git status)");
    assert_eq!(allow.len(), 9);
    assert_eq!(json["permissions"]["ask"].as_array().unwrap().len(), 3);
    assert!(json["permissions"].get("deny").is_none());
}

#[test]
fn test_generate_twice_is_stable() {
    let project = create_project(&["package.json", "Dockerfile"]);
    let settings = project.path().join(".claude/settings.json");
    let dir = path_str(project.path());

    let (first, _g1) = run(&["generate", dir, "--auto"]);
    assert!(first.status.success());
    let after_first = fs::read_to_string(&settings).unwrap();

    let (second, _g2) = run(&["generate", dir, "--auto"]);
    assert!(second.status.success());
    let after_second = fs::read_to_string(&settings).unwrap();

    assert_eq!(after_first, after_second);
    assert!(after_first.ends_with('\n'));

    let json = read_settings(&settings);
    assert_eq!(json["permissions"]["allow"][0], "Bash(npm *)");
    assert_eq!(json["permissions"]["ask"][0], "Bash(docker push *)");
}

#[test]
fn test_generate_dry_run_writes_nothing() {
    let project = create_project(&["Makefile"]);
    let (output, _guard) = run(&["generate", path_str(project.path()), "--auto", "--dry-run"]);

    assert!(output.status.success());
    assert!(!project.path().join(".claude").exists());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["permissions"]["allow"][0], "Bash(make *)");
}

#[test]
fn test_generate_custom_settings_path() {
    let project = create_project(&[]);
    let target = project.path().join("nested/dir/agent.json");

    let (output, _guard) = run(&[
        "generate",
        path_str(project.path()),
        "--stacks",
        "rust, go",
        "--settings",
        path_str(&target),
    ]);
    assert!(output.status.success());

    let json = read_settings(&target);
    assert_eq!(
        json["permissions"]["allow"],
        serde_json::json!(["Bash(cargo *)", "Bash(rustc *)", "Bash(rustup *)", "Bash(go *)"])
    );
}

#[test]
fn test_generate_unknown_stack_is_not_fatal() {
    let project = create_project(&[]);
    let settings = project.path().join(".claude/settings.json");

    let (output, _guard) = run(&["generate", path_str(project.path()), "--stacks", "cobol,make"]);
    assert!(output.status.success());

    let json = read_settings(&settings);
    assert_eq!(json["permissions"]["allow"], serde_json::json!(["Bash(make *)"]));
}

#[test]
fn test_generate_malformed_settings_replaced() {
    let project = create_project(&[]);
    let settings = project.path().join(".claude/settings.json");
    fs::create_dir_all(settings.parent().unwrap()).unwrap();
    fs::write(&settings, "{ not json").unwrap();

    let (output, _guard) = run(&["generate", path_str(project.path()), "--stacks", "go"]);
    assert!(output.status.success());

    let json = read_settings(&settings);
    assert_eq!(json["permissions"]["allow"], serde_json::json!(["Bash(go *)"]));
}

#[test]
fn test_invalid_log_level_exits_one() {
    let project = create_project(&[]);
    let (output, _guard) = run(&["detect", path_str(project.path()), "--log-level", "loud"]);
    assert_eq!(output.status.code(), Some(1));
}
