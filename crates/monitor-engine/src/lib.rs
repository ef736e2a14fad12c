//! Monitor Engine - buffered entry recording with boundary logging
//!
//! The `Monitor` collects entries in memory, flushes them to an `EntrySink`
//! and parks them on disk through an `EntryPersistence` (normally the
//! file-backed `MonitorStore`) when the host wants them kept across restarts.
//!
//! ## Logging Ownership
//!
//! The engine owns lifecycle logging for monitor operations:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure

pub mod config;
pub mod monitor;
pub mod payload;

pub use config::MonitorConfig;
pub use monitor::{FileMonitor, Monitor};
pub use payload::build_payload;
