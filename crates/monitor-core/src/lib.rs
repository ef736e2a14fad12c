//! Monitor Core - entry model, error and logging facilities
//!
//! This crate provides the foundational pieces shared by the store, engine
//! and CLI crates:
//! - The `DictionaryRepresentable` entry model and stored-data decoding
//! - Monitor entry types (method usage, performance)
//! - Persistence and sink seams used by the monitor
//! - The structured error facility (`ExError`) and logging facility

pub mod entries;
pub mod entry;
pub mod errors;
pub mod logging_facility;
pub mod ops;

// Macros expand to paths inside the schema crate
pub use monitor_core_types;

// Re-export commonly used types
pub use entries::{EntryEnvelope, MethodUsageEntry, PerformanceEntry};
pub use entry::{decode_entry_data, to_dictionary, Dictionary, DictionaryRepresentable};
pub use errors::{ExError, ExErrorKind, MonitorError, Result};
pub use ops::{EntryPersistence, EntrySink, NoopEntrySink, RejectingEntrySink};
