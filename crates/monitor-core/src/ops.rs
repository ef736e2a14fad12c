//! Persistence and sink seams
//!
//! The monitor buffers entries in memory and talks to the outside world
//! through two traits: `EntryPersistence` parks entries on disk and brings
//! them back, `EntrySink` receives flushed batches.

use crate::entry::Dictionary;
use crate::errors::{MonitorError, Result};

/// Storage that overwrites on persist and clears on retrieve
pub trait EntryPersistence: Send + Sync {
    /// Replace stored content with `entries`, encoded as one JSON array.
    ///
    /// # Errors
    ///
    /// `Serialization` or `Io` when the content cannot be written.
    fn persist_dictionaries(&self, entries: &[Dictionary]) -> Result<()>;

    /// Take the stored JSON text, leaving storage empty.
    ///
    /// Returns `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// `Io` when the storage cannot be cleared after reading.
    fn retrieve_entry_data(&self) -> Result<Option<Vec<u8>>>;
}

/// Destination for flushed entries
pub trait EntrySink: Send + Sync {
    /// Deliver one batch.
    ///
    /// # Errors
    ///
    /// `ExternalService` when the batch is refused.
    fn send(&self, entries: &[Dictionary]) -> Result<()>;
}

/// Accepts and drops every batch (CLI default and tests that don't test delivery).
pub struct NoopEntrySink;

impl EntrySink for NoopEntrySink {
    fn send(&self, _: &[Dictionary]) -> Result<()> {
        Ok(())
    }
}

/// Refuses every batch (for tests that verify failed flushes keep entries).
pub struct RejectingEntrySink;

impl EntrySink for RejectingEntrySink {
    fn send(&self, entries: &[Dictionary]) -> Result<()> {
        Err(MonitorError::SinkRejected {
            count: entries.len(),
            reason: "RejectingEntrySink".to_string(),
        }
        .into())
    }
}
