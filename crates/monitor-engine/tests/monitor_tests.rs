#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{Duration, Utc};
use monitor_core::entry::{decode_entry_data, Dictionary};
use monitor_core::errors::{ExError, ExErrorKind, Result};
use monitor_core::logging_facility::test_capture::init_test_capture;
use monitor_core::ops::{EntryPersistence, EntrySink, NoopEntrySink};
use monitor_core::{EntryEnvelope, MethodUsageEntry, PerformanceEntry};
use monitor_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ENTRY_COUNT, FIELD_PENDING,
};
use monitor_engine::{FileMonitor, Monitor, MonitorConfig};
use monitor_store::MonitorStore;
use serde_json::json;
use std::sync::Mutex;
use tempfile::TempDir;

/// Sink that keeps every batch it receives
#[derive(Default)]
struct RecordingSink {
    batches: Mutex<Vec<Vec<Dictionary>>>,
}

impl RecordingSink {
    fn batches(&self) -> Vec<Vec<Dictionary>> {
        self.batches.lock().unwrap().clone()
    }
}

impl EntrySink for RecordingSink {
    fn send(&self, entries: &[Dictionary]) -> Result<()> {
        self.batches.lock().unwrap().push(entries.to_vec());
        Ok(())
    }
}

/// Storage whose retrieve always fails
struct UnreadablePersistence;

impl EntryPersistence for UnreadablePersistence {
    fn persist_dictionaries(&self, _: &[Dictionary]) -> Result<()> {
        Ok(())
    }

    fn retrieve_entry_data(&self) -> Result<Option<Vec<u8>>> {
        Err(ExError::new(ExErrorKind::Io)
            .with_op("clear")
            .with_message("permission denied"))
    }
}

fn setup_monitor(config: MonitorConfig) -> (FileMonitor<RecordingSink>, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let store = MonitorStore::new(dir.path().join("monitor.json"));
    (Monitor::new(store, RecordingSink::default(), config), dir)
}

#[test]
fn test_record_then_flush_delivers_in_order() {
    let (monitor, _dir) = setup_monitor(MonitorConfig::default());
    monitor.enable().unwrap();

    monitor.record(&MethodUsageEntry::new("login")).unwrap();
    monitor.record(&MethodUsageEntry::new("share")).unwrap();
    let delivered = monitor.flush().unwrap();

    assert_eq!(delivered, 2);
    let batches = monitor.sink().batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0][0]["method"], "login");
    assert_eq!(batches[0][1]["method"], "share");
    assert_eq!(monitor.pending().unwrap(), 0);
}

#[test]
fn test_flush_limit_triggers_automatic_flush() {
    let (monitor, _dir) = setup_monitor(MonitorConfig::default().with_flush_limit(3));
    monitor.enable().unwrap();

    for i in 0..7 {
        monitor.record(&json!({ "i": i })).unwrap();
    }

    let batches = monitor.sink().batches();
    assert_eq!(batches.len(), 2);
    assert!(batches.iter().all(|b| b.len() == 3));
    assert_eq!(monitor.pending().unwrap(), 1);
}

#[test]
fn test_zero_flush_limit_never_flushes_automatically() {
    let (monitor, _dir) = setup_monitor(MonitorConfig::default().with_flush_limit(0));
    monitor.enable().unwrap();

    for i in 0..10 {
        monitor.record(&json!({ "i": i })).unwrap();
    }

    assert!(monitor.sink().batches().is_empty());
    assert_eq!(monitor.pending().unwrap(), 10);
}

#[test]
fn test_park_writes_store_and_clears_buffer() {
    let (monitor, _dir) = setup_monitor(MonitorConfig::default());
    monitor.enable().unwrap();
    monitor.record(&json!({"a": 1})).unwrap();

    let parked = monitor.park().unwrap();

    assert_eq!(parked, 1);
    assert_eq!(monitor.pending().unwrap(), 0);
    let data = monitor.persistence().retrieve_entry_data().unwrap();
    assert_eq!(data, Some(br#"[{"a":1}]"#.to_vec()));
}

#[test]
fn test_enable_restores_parked_entries_before_buffered_ones() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("monitor.json");

    // Given: A previous run parked two entries
    let previous = Monitor::new(
        MonitorStore::new(&path),
        NoopEntrySink,
        MonitorConfig::default(),
    );
    previous.enable().unwrap();
    previous.record(&json!({"run": 1, "i": 0})).unwrap();
    previous.record(&json!({"run": 1, "i": 1})).unwrap();
    previous.park().unwrap();

    // When: A new monitor buffers one entry while disabled-then-enabled
    let current = Monitor::new(
        MonitorStore::new(&path),
        RecordingSink::default(),
        MonitorConfig::default(),
    );
    let restored = current.enable().unwrap();
    current.record(&json!({"run": 2})).unwrap();
    current.flush().unwrap();

    // Then: Parked entries come first and the file is gone
    assert_eq!(restored, 2);
    let batch = &current.sink().batches()[0];
    assert_eq!(batch.len(), 3);
    assert_eq!(batch[0]["run"], 1);
    assert_eq!(batch[2]["run"], 2);
    assert!(!path.exists());
}

#[test]
fn test_enable_with_nothing_parked() {
    let (monitor, _dir) = setup_monitor(MonitorConfig::default());

    assert_eq!(monitor.enable().unwrap(), 0);
    assert!(monitor.is_enabled());
}

#[test]
fn test_enable_drops_undecodable_parked_data() {
    let (monitor, _dir) = setup_monitor(MonitorConfig::default());
    std::fs::write(monitor.persistence().path(), b"not json").unwrap();

    assert_eq!(monitor.enable().unwrap(), 0);
    assert_eq!(monitor.pending().unwrap(), 0);
    assert!(!monitor.persistence().path().exists());
}

#[test]
fn test_disable_keeps_buffer() {
    let (monitor, _dir) = setup_monitor(MonitorConfig::default());
    monitor.enable().unwrap();
    monitor.record(&json!({"kept": true})).unwrap();

    monitor.disable();
    monitor.record(&json!({"ignored": true})).unwrap();

    assert!(!monitor.is_enabled());
    assert_eq!(monitor.pending().unwrap(), 1);
}

#[test]
fn test_park_failure_leaves_buffer_untouched() {
    let dir = TempDir::new().unwrap();
    let store = MonitorStore::new(dir.path().join("missing").join("monitor.json"));
    let monitor = Monitor::new(store, NoopEntrySink, MonitorConfig::default());
    monitor.enable().unwrap();
    monitor.record(&json!({"a": 1})).unwrap();

    let err = monitor.park().unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Io);
    assert_eq!(monitor.pending().unwrap(), 1);
}

#[test]
fn test_payload_carries_app_id_and_entries() {
    let (monitor, _dir) = setup_monitor(MonitorConfig::default().with_app_id("1234"));
    monitor.enable().unwrap();
    let start = Utc::now();
    let entry = PerformanceEntry::with_envelope(
        EntryEnvelope::new("launch").with_device_model("arm64"),
        "launch",
        start,
        start + Duration::milliseconds(250),
    )
    .unwrap();
    monitor.record(&entry).unwrap();

    let payload = monitor.payload().unwrap();

    assert_eq!(payload["app_id"], "1234");
    let entries = decode_entry_data(payload["monitorings"].as_str().unwrap().as_bytes()).unwrap();
    assert_eq!(entries[0]["event_name"], "performance");
    assert_eq!(entries[0]["time_spent"], 250);
    assert_eq!(entries[0]["device_model"], "arm64");
}

#[test]
fn test_operations_emit_lifecycle_events() {
    let capture = init_test_capture();
    let (monitor, _dir) = setup_monitor(MonitorConfig::default());

    monitor.enable().unwrap();
    monitor.record(&json!({"a": 1})).unwrap();
    monitor.park().unwrap();

    for op in ["monitor_enable", "monitor_record", "monitor_park"] {
        capture.assert_event_exists(op, EVENT_START);
        capture.assert_event_exists(op, EVENT_END);
    }

    // Capture is shared across tests, so match on any end event
    let ended_with = |op: &str, key: &str, value: &str| {
        capture.count_events(|e| e.is(op, EVENT_END) && e.field(key) == Some(value)) > 0
    };
    assert!(ended_with("monitor_enable", FIELD_ENTRY_COUNT, "0"));
    assert!(ended_with("monitor_record", FIELD_PENDING, "1"));
    assert!(ended_with("monitor_park", FIELD_ENTRY_COUNT, "1"));
}

#[test]
fn test_failed_restore_leaves_monitor_disabled() {
    let capture = init_test_capture();
    let monitor = Monitor::new(UnreadablePersistence, NoopEntrySink, MonitorConfig::default());

    let err = monitor.enable().unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Io);
    assert!(!monitor.is_enabled());
    monitor.record(&json!({"dropped": true})).unwrap();
    assert_eq!(monitor.pending().unwrap(), 0);
    capture.assert_event_exists("monitor_enable", EVENT_END_ERROR);
}

#[test]
fn test_drain_hands_out_restored_entries_after_failed_park() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("monitor.json");
    MonitorStore::new(&path)
        .persist(&[json!({"i": 0}), json!({"i": 1})])
        .unwrap();

    // Given: Parked entries were restored, then the directory vanished
    let monitor = Monitor::new(MonitorStore::new(&path), NoopEntrySink, MonitorConfig::default());
    assert_eq!(monitor.enable().unwrap(), 2);
    dir.close().unwrap();

    // When: Parking fails
    assert!(monitor.park().is_err());

    // Then: The entries are still held and can be taken out in order
    assert_eq!(monitor.pending().unwrap(), 2);
    let drained = monitor.drain().unwrap();
    assert_eq!(drained[0]["i"], 0);
    assert_eq!(drained[1]["i"], 1);
    assert_eq!(monitor.pending().unwrap(), 0);
}
