//! Monitor Store - file-backed entry persistence
//!
//! Provides:
//! - `MonitorStore`: one JSON file holding an array of entry objects,
//!   overwritten on persist and cleared on retrieve
//! - Atomic write primitive (temp file + rename in the target directory)

pub mod errors;
pub mod fs;

// Re-export key types
pub use errors::Result;
pub use fs::MonitorStore;
