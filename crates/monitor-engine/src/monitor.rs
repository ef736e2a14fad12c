//! Buffered monitor
//!
//! Entries are converted to dictionaries as they are recorded and kept in
//! memory until one of:
//! - `flush` hands them to the sink (automatically once `flush_limit` is hit)
//! - `park` writes them through the persistence layer
//!
//! `enable` brings parked entries back into the buffer. Reading parked data
//! clears it on disk, so a crash between `enable` and the next `park` or
//! `flush` loses those entries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use monitor_core::entry::{decode_entry_data, Dictionary, DictionaryRepresentable};
use monitor_core::errors::{MonitorError, Result};
use monitor_core::ops::{EntryPersistence, EntrySink};
use monitor_core::{log_op_end, log_op_error, log_op_start};
use monitor_store::MonitorStore;

use crate::config::MonitorConfig;
use crate::payload::build_payload;

/// Monitor parking its entries in a `MonitorStore` file
pub type FileMonitor<S> = Monitor<MonitorStore, S>;

pub struct Monitor<P: EntryPersistence, S: EntrySink> {
    persistence: P,
    sink: S,
    config: MonitorConfig,
    enabled: AtomicBool,
    buffer: Mutex<Vec<Dictionary>>,
}

impl<P: EntryPersistence, S: EntrySink> Monitor<P, S> {
    /// Create a disabled monitor with an empty buffer
    pub fn new(persistence: P, sink: S, config: MonitorConfig) -> Self {
        Self {
            persistence,
            sink,
            config,
            enabled: AtomicBool::new(false),
            buffer: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Number of buffered entries
    ///
    /// # Errors
    ///
    /// `Concurrency` if the buffer lock was poisoned.
    pub fn pending(&self) -> Result<usize> {
        Ok(self.lock_buffer()?.len())
    }

    /// Start accepting entries and restore parked ones
    ///
    /// Parked entries go in front of anything already buffered. Returns how
    /// many were restored. Parked data that does not decode is dropped with
    /// a warning; it has already been cleared from storage. The monitor
    /// stays disabled when the restore fails.
    ///
    /// # Errors
    ///
    /// Propagates persistence errors from the retrieve.
    pub fn enable(&self) -> Result<usize> {
        log_op_start!("monitor_enable");
        let start = Instant::now();

        let restored = self.restore_impl().map_err(|e| {
            log_op_error!(
                "monitor_enable",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;
        self.enabled.store(true, Ordering::SeqCst);

        log_op_end!(
            "monitor_enable",
            duration_ms = start.elapsed().as_millis() as u64,
            entry_count = restored
        );
        Ok(restored)
    }

    fn restore_impl(&self) -> Result<usize> {
        let Some(data) = self.persistence.retrieve_entry_data()? else {
            return Ok(0);
        };

        let mut restored = match decode_entry_data(&data) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, bytes = data.len(), "dropping undecodable parked entries");
                return Ok(0);
            }
        };

        let count = restored.len();
        let mut buffer = self.lock_buffer()?;
        restored.append(&mut buffer);
        *buffer = restored;
        Ok(count)
    }

    /// Stop accepting entries; buffered ones are kept
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        tracing::debug!("monitor disabled");
    }

    /// Buffer one entry
    ///
    /// Ignored while disabled. Flushes when the buffer reaches
    /// `flush_limit`.
    ///
    /// # Errors
    ///
    /// `Serialization` if the entry has no object representation, or the
    /// sink error when the automatic flush fails (the entry stays buffered).
    pub fn record<E: DictionaryRepresentable + ?Sized>(&self, entry: &E) -> Result<()> {
        if !self.is_enabled() {
            tracing::debug!("monitor disabled, entry ignored");
            return Ok(());
        }

        log_op_start!("monitor_record");
        let start = Instant::now();

        let pending = self.record_impl(entry).map_err(|e| {
            log_op_error!(
                "monitor_record",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "monitor_record",
            duration_ms = start.elapsed().as_millis() as u64,
            pending = pending
        );

        if self.config.flush_limit > 0 && pending >= self.config.flush_limit {
            self.flush()?;
        }
        Ok(())
    }

    fn record_impl<E: DictionaryRepresentable + ?Sized>(&self, entry: &E) -> Result<usize> {
        let dictionary = entry.dictionary_representation()?;
        let mut buffer = self.lock_buffer()?;
        buffer.push(dictionary);
        Ok(buffer.len())
    }

    /// Hand every buffered entry to the sink
    ///
    /// Returns the number delivered. An empty buffer does not reach the
    /// sink. When the sink fails the batch goes back to the front of the
    /// buffer.
    ///
    /// # Errors
    ///
    /// The sink's error.
    pub fn flush(&self) -> Result<usize> {
        log_op_start!("monitor_flush");
        let start = Instant::now();

        let delivered = self.flush_impl().map_err(|e| {
            log_op_error!(
                "monitor_flush",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "monitor_flush",
            duration_ms = start.elapsed().as_millis() as u64,
            entry_count = delivered
        );
        Ok(delivered)
    }

    fn flush_impl(&self) -> Result<usize> {
        let mut batch = std::mem::take(&mut *self.lock_buffer()?);
        if batch.is_empty() {
            return Ok(0);
        }

        if let Err(e) = self.sink.send(&batch) {
            let mut buffer = self.lock_buffer()?;
            batch.append(&mut buffer);
            *buffer = batch;
            return Err(e);
        }
        Ok(batch.len())
    }

    /// Write the buffer through the persistence layer and clear it
    ///
    /// Overwrites whatever was parked before; an empty buffer parks `[]`.
    /// Returns the number parked. On failure the buffer is left as it was.
    ///
    /// # Errors
    ///
    /// Persistence errors (`Serialization`, `Io`).
    pub fn park(&self) -> Result<usize> {
        log_op_start!("monitor_park");
        let start = Instant::now();

        let parked = self.park_impl().map_err(|e| {
            log_op_error!(
                "monitor_park",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "monitor_park",
            duration_ms = start.elapsed().as_millis() as u64,
            entry_count = parked
        );
        Ok(parked)
    }

    fn park_impl(&self) -> Result<usize> {
        let mut buffer = self.lock_buffer()?;
        self.persistence.persist_dictionaries(&buffer)?;
        let parked = buffer.len();
        buffer.clear();
        Ok(parked)
    }

    /// Take every buffered entry out of the monitor
    ///
    /// Used when neither the sink nor the persistence layer can take the
    /// entries and the caller has to hand them somewhere else.
    ///
    /// # Errors
    ///
    /// `Concurrency` if the buffer lock was poisoned.
    pub fn drain(&self) -> Result<Vec<Dictionary>> {
        let drained = std::mem::take(&mut *self.lock_buffer()?);
        tracing::debug!(entry_count = drained.len(), "buffer drained");
        Ok(drained)
    }

    /// Flush payload for the current buffer, without draining it
    ///
    /// # Errors
    ///
    /// `Serialization` if the entries cannot be encoded.
    pub fn payload(&self) -> Result<serde_json::Value> {
        let buffer = self.lock_buffer()?;
        build_payload(self.config.app_id.as_deref(), &buffer)
    }

    fn lock_buffer(&self) -> Result<MutexGuard<'_, Vec<Dictionary>>> {
        self.buffer.lock().map_err(|_| {
            MonitorError::LockPoisoned {
                resource: "monitor buffer".to_string(),
            }
            .into()
        })
    }
}
