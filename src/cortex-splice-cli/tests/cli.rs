//! Black-box tests for the `cortex-splice` binary.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

struct Workspace {
    _dir: TempDir,
    target: PathBuf,
    content: PathBuf,
}

fn workspace(target: &str, content: &str) -> Workspace {
    let dir = TempDir::new().unwrap();
    let target_path = dir.path().join("target.txt");
    let content_path = dir.path().join("content.txt");
    fs::write(&target_path, target).unwrap();
    fs::write(&content_path, content).unwrap();
    Workspace {
        _dir: dir,
        target: target_path,
        content: content_path,
    }
}

fn splice_cmd(ws: &Workspace, start: &str, end: &str) -> Command {
    let mut cmd = Command::cargo_bin("cortex-splice").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg(&ws.target)
        .arg(start)
        .arg(end)
        .arg(&ws.content);
    cmd
}

#[test]
fn replaces_range_and_prints_success() {
    let ws = workspace("a\nb\nc\nd\n", "X\nY\n");

    splice_cmd(&ws, "2", "3")
        .assert()
        .success()
        .stdout("Success\n");

    assert_eq!(fs::read_to_string(&ws.target).unwrap(), "a\nX\nY\nd\n");
}

#[test]
fn appends_missing_newline_to_content() {
    let ws = workspace("a\nb\nc\n", "noeol");

    splice_cmd(&ws, "2", "2").assert().success();

    assert_eq!(fs::read_to_string(&ws.target).unwrap(), "a\nnoeol\nc\n");
}

#[test]
fn end_past_file_replaces_whole_file() {
    let ws = workspace("one\ntwo\n", "Z\n");

    splice_cmd(&ws, "1", "10").assert().success();

    assert_eq!(fs::read_to_string(&ws.target).unwrap(), "Z\n");
}

#[test]
fn missing_content_reports_error_and_keeps_target() {
    let ws = workspace("a\nb\n", "");
    fs::remove_file(&ws.content).unwrap();

    splice_cmd(&ws, "1", "1")
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Error: File not found"));

    assert_eq!(fs::read_to_string(&ws.target).unwrap(), "a\nb\n");
}

#[test]
fn non_integer_bound_is_usage_error() {
    let ws = workspace("a\n", "x\n");

    splice_cmd(&ws, "first", "1")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));

    assert_eq!(fs::read_to_string(&ws.target).unwrap(), "a\n");
}

#[test]
fn reversed_range_is_rejected_by_default() {
    let ws = workspace("a\nb\nc\n", "x\n");

    splice_cmd(&ws, "3", "1")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("start is after end"));

    assert_eq!(fs::read_to_string(&ws.target).unwrap(), "a\nb\nc\n");
}

#[test]
fn legacy_policy_accepts_negative_start() {
    let ws = workspace("a\nb\nc\nd\n", "X\n");

    splice_cmd(&ws, "-1", "2")
        .args(["--policy", "legacy"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&ws.target).unwrap(), "a\nb\nX\nc\nd\n");
}

#[test]
fn strict_policy_rejects_end_past_file() {
    let ws = workspace("one\ntwo\n", "Z\n");

    splice_cmd(&ws, "1", "10")
        .args(["--policy", "strict"])
        .assert()
        .code(2)
        .stdout(predicate::str::starts_with("Error: Invalid line range"));
}

#[test]
fn dry_run_prints_diff_without_writing() {
    let ws = workspace("a\nb\nc\n", "B\n");

    splice_cmd(&ws, "2", "2")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("-b\n")
                .and(predicate::str::contains("+B\n"))
                .and(predicate::str::ends_with("Success\n")),
        );

    assert_eq!(fs::read_to_string(&ws.target).unwrap(), "a\nb\nc\n");
}

#[test]
fn json_output_reports_success() {
    let ws = workspace("a\nb\n", "X\n");

    let output = splice_cmd(&ws, "1", "1").arg("--json").output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["report"]["first_line"], 1);
    assert_eq!(value["report"]["new_line_count"], 2);
    assert_eq!(value["report"]["policy"], "clamp");
}

#[test]
fn json_output_reports_error_kind() {
    let ws = workspace("a\n", "");
    fs::write(&ws.content, [0xff, 0xfe, 0xfd]).unwrap();

    let output = splice_cmd(&ws, "1", "1").arg("--json").output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "error");
    assert_eq!(value["kind"], "decoding");
}

#[test]
fn logs_stay_off_stdout() {
    let ws = workspace("a\nb\n", "X\n");

    splice_cmd(&ws, "1", "1")
        .args(["--log-level", "debug"])
        .assert()
        .success()
        .stdout("Success\n")
        .stderr(predicate::str::contains("resolved line range"));
}
