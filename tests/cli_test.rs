use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn todoz(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("todoz").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("TODOZ_LOG")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

#[test]
fn test_buy_milk_lifecycle() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();

    todoz(dir)
        .args(["add", "Buy", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added: Buy milk"));

    todoz(dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. [ ] Buy milk"));

    todoz(dir)
        .args(["toggle", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed: Buy milk"));

    todoz(dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("1. [x] Buy milk"))
        .stdout(predicate::str::contains("1 total · 1 completed · 0 pending"));

    todoz(dir)
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted: Buy milk"));

    assert_eq!(fs::read_to_string(dir.join("todos.json")).unwrap(), "[]");
}

#[test]
fn test_stored_format() {
    let temp_dir = tempfile::tempdir().unwrap();
    todoz(temp_dir.path())
        .args(["add", "  Walk   dog "])
        .assert()
        .success();

    let raw = fs::read_to_string(temp_dir.path().join("todos.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let item = &value[0];
    assert_eq!(item["text"], "Walk   dog");
    assert_eq!(item["completed"], false);
    assert!(item["createdAt"].is_i64());
    assert!(item["id"].is_string());
}

#[test]
fn test_rejects_blank_and_long_text() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();

    todoz(dir)
        .args(["add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 500 characters"));

    todoz(dir)
        .args(["add", &"a".repeat(501)])
        .assert()
        .failure();

    assert!(!dir.join("todos.json").exists());
}

#[test]
fn test_edit_and_stats() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();

    todoz(dir).args(["add", "First"]).assert().success();
    todoz(dir).args(["add", "Second"]).assert().success();

    // Newest first: "Second" is 1
    todoz(dir)
        .args(["edit", "2", "First", "edited"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated: First edited"));

    todoz(dir)
        .args(["edit", "2", "First edited"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to change."));

    todoz(dir).args(["done", "1"]).assert().success();

    todoz(dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2 total · 1 completed · 1 pending",
        ));
}

#[test]
fn test_unknown_selector_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    todoz(temp_dir.path())
        .args(["toggle", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Index 3 not found"));
}

#[test]
fn test_corrupt_store_lists_empty() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("todos.json"), "not json{").unwrap();

    todoz(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No todos yet"));
}

#[test]
fn test_clear_requires_confirmation() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();
    todoz(dir).args(["add", "Keep me"]).assert().success();

    todoz(dir)
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
    assert!(dir.join("todos.json").exists());

    todoz(dir).args(["clear", "--yes"]).assert().success();
    assert!(!dir.join("todos.json").exists());
}

#[test]
fn test_config_set_and_get() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();

    todoz(dir)
        .args(["config", "max-text-length", "5"])
        .assert()
        .success();

    todoz(dir)
        .args(["config", "max-text-length"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max-text-length = 5"));

    todoz(dir)
        .args(["add", "too long"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 5 characters"));

    todoz(dir)
        .args(["config", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_storage_key_changes_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();

    todoz(dir)
        .args(["config", "storage-key", "work"])
        .assert()
        .success();
    todoz(dir).args(["add", "Ship it"]).assert().success();

    assert!(dir.join("work.json").exists());
    assert!(!dir.join("todos.json").exists());
    todoz(dir)
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains("work.json"));
}

#[test]
fn test_quota_failure_exits_with_message() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();

    todoz(dir)
        .args(["config", "quota-bytes", "200"])
        .assert()
        .success();

    todoz(dir)
        .args(["add", &"x".repeat(300)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Storage limit reached"));

    todoz(dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No todos yet"));
}

#[test]
fn test_home_env_is_used_without_flag() {
    let temp_dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("todoz")
        .unwrap()
        .env("NO_COLOR", "1")
        .env("TODOZ_HOME", temp_dir.path())
        .args(["add", "From env"])
        .assert()
        .success();

    assert!(temp_dir.path().join("todos.json").exists());
}
