//! CLI integration tests
//!
//! These tests run the built binary against a store in a scratch directory.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(store: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_monitor-cli"))
        .args(args)
        .arg("--store")
        .arg(store)
        .env_remove("MONITOR_APP_ID")
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI")
}

fn store_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("state").join("entries.json")
}

#[test]
fn test_cli_persist_then_retrieve_twice() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_path(&temp_dir);
    let input = temp_dir.path().join("input.json");
    fs::write(&input, r#"[{"a":1}]"#).unwrap();

    let persisted = run(&store, &["persist", "--input", input.to_str().unwrap()]);
    assert!(
        persisted.status.success(),
        "persist failed: {}",
        String::from_utf8_lossy(&persisted.stderr)
    );

    let first = run(&store, &["retrieve"]);
    assert!(first.status.success());
    assert_eq!(first.stdout, br#"[{"a":1}]"#);

    let second = run(&store, &["retrieve"]);
    assert!(second.status.success());
    assert!(second.stdout.is_empty(), "Second retrieve should print nothing");
}

#[test]
fn test_cli_persist_rejects_non_object_elements() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_path(&temp_dir);
    let input = temp_dir.path().join("input.json");
    fs::write(&input, "[1, 2]").unwrap();

    let output = run(&store, &["persist", "--input", input.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_SERIALIZATION"));
    assert!(!store.exists());
}

#[test]
fn test_cli_persist_rejects_non_array_input() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_path(&temp_dir);
    let input = temp_dir.path().join("input.json");
    fs::write(&input, r#"{"a":1}"#).unwrap();

    let output = run(&store, &["persist", "--input", input.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("JSON array"));
}

#[test]
fn test_cli_record_accumulates_then_flush_prints_payload() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_path(&temp_dir);

    let first = run(&store, &["record", "method-usage", "--method", "login"]);
    assert!(first.status.success());
    let second = run(
        &store,
        &[
            "record",
            "performance",
            "--name",
            "launch",
            "--start-ms",
            "1700000000000",
            "--end-ms",
            "1700000000750",
        ],
    );
    assert!(second.status.success());

    let flushed = run(&store, &["flush", "--app-id", "4242"]);
    assert!(flushed.status.success());

    let payload: Value = serde_json::from_slice(&flushed.stdout).unwrap();
    assert_eq!(payload["app_id"], "4242");
    let entries: Value =
        serde_json::from_str(payload["monitorings"].as_str().unwrap()).unwrap();
    assert_eq!(entries[0]["method"], "login");
    assert_eq!(entries[1]["name"], "launch");
    assert_eq!(entries[1]["time_spent"], 750);
    assert_eq!(entries[1]["time_start"], 1_700_000_000);

    // Flushing drained the store
    assert!(!store.exists());
}

#[test]
fn test_cli_record_rejects_backwards_performance_sample() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_path(&temp_dir);

    let output = run(
        &store,
        &[
            "record",
            "performance",
            "--name",
            "backwards",
            "--start-ms",
            "2000",
            "--end-ms",
            "1000",
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_INVALID_INPUT"));
}

#[test]
fn test_cli_flush_with_empty_store_prints_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_path(&temp_dir);

    let output = run(&store, &["flush"]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}
