//! File-backed entry store
//!
//! One store owns one path. `persist` overwrites the file with a JSON array
//! of entry objects; `retrieve_entry_data` hands the raw JSON text back and
//! removes the file in the same call.

use crate::errors::{io_error, lock_poisoned, serialization_error, Result};
use crate::fs::atomic::{atomic_write, sibling_path};
use monitor_core::entry::{Dictionary, DictionaryRepresentable};
use monitor_core::errors::{ExError, ExErrorKind};
use monitor_core::ops::EntryPersistence;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Extension appended to the file name while a retrieve holds the content
const CLAIM_SUFFIX: &str = ".claim";

/// Store bound to a single JSON file
///
/// There is no parameterless constructor; a path is always required. The
/// store keeps no file handle open between calls. Calls on the same value
/// are serialized by an internal lock; separate values or processes on the
/// same path are not coordinated.
#[derive(Debug)]
pub struct MonitorStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl MonitorStore {
    /// Bind a store to `path`. Nothing is created or validated.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with the JSON array encoding of `entries`
    ///
    /// Order is preserved. Prior content is destroyed even when `entries`
    /// is empty (the file then holds `[]`). The parent directory is not
    /// created.
    ///
    /// # Errors
    ///
    /// - `Serialization` if an entry has no object representation; nothing
    ///   is written and prior content survives
    /// - `Io` if the file cannot be written
    /// - `Concurrency` if the store lock was poisoned
    pub fn persist<E: DictionaryRepresentable>(&self, entries: &[E]) -> Result<()> {
        let _guard = self.guard.lock().map_err(|_| lock_poisoned(&self.path))?;

        let dictionaries = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                entry.dictionary_representation().map_err(|e| {
                    ExError::new(ExErrorKind::Serialization)
                        .with_op("persist")
                        .with_path(self.path.display().to_string())
                        .with_message(format!("entry {} is not representable", index))
                        .with_source(e)
                })
            })
            .collect::<Result<Vec<Dictionary>>>()?;

        let content = serde_json::to_vec(&dictionaries)
            .map_err(|e| serialization_error("persist", &self.path, e))?;

        atomic_write(&self.path, &content)?;

        tracing::debug!(
            path = %self.path.display(),
            entry_count = dictionaries.len(),
            bytes = content.len(),
            "persisted entries"
        );
        Ok(())
    }

    /// Take the stored JSON text and clear the storage
    ///
    /// The file is claimed by renaming it aside, read, then deleted, so the
    /// path no longer exists afterwards and the same content is never
    /// returned twice. Returns `Ok(None)` when no file exists, it is empty,
    /// or it cannot be claimed or read.
    ///
    /// A claim file left by an interrupted retrieve holds content no caller
    /// received. It is handed out before anything else: moved back to the
    /// store path when that is free, otherwise returned on its own with the
    /// store path left for the next call.
    ///
    /// # Errors
    ///
    /// - `Io` if the claimed file cannot be deleted; the content is put back
    ///   at the store path and not returned
    /// - `Io` if a leftover claim cannot be recovered; it stays on disk
    /// - `Concurrency` if the store lock was poisoned
    pub fn retrieve_entry_data(&self) -> Result<Option<Vec<u8>>> {
        let _guard = self.guard.lock().map_err(|_| lock_poisoned(&self.path))?;

        let claim_path = sibling_path(&self.path, CLAIM_SUFFIX);
        if claim_path.exists() {
            if let Some(bytes) = self.recover_claim(&claim_path)? {
                return Ok(Some(bytes));
            }
        }

        if let Err(e) = fs::rename(&self.path, &claim_path) {
            tracing::debug!(path = %self.path.display(), error = %e, "no entry data to claim");
            return Ok(None);
        }

        let bytes = match fs::read(&claim_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "claimed entry data unreadable");
                let _ = fs::rename(&claim_path, &self.path);
                return Ok(None);
            }
        };

        if let Err(e) = fs::remove_file(&claim_path) {
            let _ = fs::rename(&claim_path, &self.path);
            return Err(io_error("clear", &self.path, e));
        }

        tracing::debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            "retrieved entry data"
        );

        if bytes.is_empty() {
            Ok(None)
        } else {
            Ok(Some(bytes))
        }
    }

    /// Deal with a claim that outlived its retrieve
    ///
    /// Returns the claim's bytes when they must be handed out right away
    /// (store path occupied by newer content). Returns `None` when the claim
    /// was moved back to the store path, or was empty and removed, so the
    /// regular claim below picks up whatever is stored.
    fn recover_claim(&self, claim_path: &Path) -> Result<Option<Vec<u8>>> {
        if !self.path.exists() {
            fs::rename(claim_path, &self.path)
                .map_err(|e| io_error("recover_claim", &self.path, e))?;
            tracing::warn!(path = %self.path.display(), "recovered entry data from an interrupted retrieve");
            return Ok(None);
        }

        let bytes = fs::read(claim_path).map_err(|e| io_error("recover_claim", &self.path, e))?;
        fs::remove_file(claim_path).map_err(|e| io_error("recover_claim", &self.path, e))?;

        if bytes.is_empty() {
            return Ok(None);
        }
        tracing::warn!(
            path = %self.path.display(),
            bytes = bytes.len(),
            "returning entry data from an interrupted retrieve ahead of newer content"
        );
        Ok(Some(bytes))
    }
}

impl EntryPersistence for MonitorStore {
    fn persist_dictionaries(&self, entries: &[Dictionary]) -> Result<()> {
        self.persist(entries)
    }

    fn retrieve_entry_data(&self) -> Result<Option<Vec<u8>>> {
        MonitorStore::retrieve_entry_data(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn setup_test_store() -> (MonitorStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = MonitorStore::new(temp_dir.path().join("entries.json"));
        (store, temp_dir)
    }

    #[test]
    fn test_persist_retrieve_roundtrip() {
        let (store, _dir) = setup_test_store();

        store.persist(&[json!({"a": 1})]).unwrap();

        let data = store.retrieve_entry_data().unwrap();
        assert_eq!(data.as_deref(), Some(&b"[{\"a\":1}]"[..]));
    }

    #[test]
    fn test_retrieve_clears_storage() {
        let (store, _dir) = setup_test_store();
        store.persist(&[json!({"a": 1})]).unwrap();

        store.retrieve_entry_data().unwrap();

        assert!(!store.path().exists());
        assert_eq!(store.retrieve_entry_data().unwrap(), None);
    }

    #[test]
    fn test_empty_file_is_no_data() {
        let (store, _dir) = setup_test_store();
        fs::write(store.path(), b"").unwrap();

        assert_eq!(store.retrieve_entry_data().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_leftover_claim_is_returned() {
        let (store, _dir) = setup_test_store();
        let claim_path = sibling_path(store.path(), CLAIM_SUFFIX);
        fs::write(&claim_path, b"[{\"unreturned\":1}]").unwrap();

        let data = store.retrieve_entry_data().unwrap();

        assert_eq!(data.as_deref(), Some(&b"[{\"unreturned\":1}]"[..]));
        assert!(!claim_path.exists());
        assert_eq!(store.retrieve_entry_data().unwrap(), None);
    }

    #[test]
    fn test_leftover_claim_precedes_newer_content() {
        let (store, _dir) = setup_test_store();
        let claim_path = sibling_path(store.path(), CLAIM_SUFFIX);
        fs::write(&claim_path, b"[{\"older\":1}]").unwrap();
        store.persist(&[json!({"newer": 1})]).unwrap();

        let first = store.retrieve_entry_data().unwrap().unwrap();
        let second = store.retrieve_entry_data().unwrap().unwrap();

        assert_eq!(first, b"[{\"older\":1}]");
        assert_eq!(second, b"[{\"newer\":1}]");
        assert_eq!(store.retrieve_entry_data().unwrap(), None);
    }

    #[test]
    fn test_empty_leftover_claim_is_discarded() {
        let (store, _dir) = setup_test_store();
        let claim_path = sibling_path(store.path(), CLAIM_SUFFIX);
        fs::write(&claim_path, b"").unwrap();
        store.persist(&[json!({"fresh": 1})]).unwrap();

        let data = store.retrieve_entry_data().unwrap().unwrap();

        assert_eq!(data, b"[{\"fresh\":1}]");
        assert!(!claim_path.exists());
    }

    #[test]
    fn test_non_object_entry_keeps_prior_content() {
        let (store, _dir) = setup_test_store();
        store.persist(&[json!({"keep": true})]).unwrap();

        let err = store.persist(&[json!({"ok": 1}), Value::from("nope")]).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::Serialization);
        assert!(err.message().contains("entry 1"));
        assert_eq!(fs::read(store.path()).unwrap(), b"[{\"keep\":true}]");
    }

    #[test]
    fn test_entry_persistence_trait() {
        let (store, _dir) = setup_test_store();
        let persistence: &dyn EntryPersistence = &store;
        let mut dict = Dictionary::new();
        dict.insert("k".to_string(), json!("v"));

        persistence.persist_dictionaries(&[dict]).unwrap();

        assert_eq!(
            persistence.retrieve_entry_data().unwrap().as_deref(),
            Some(&b"[{\"k\":\"v\"}]"[..])
        );
    }
}
