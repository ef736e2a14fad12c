//! Filesystem storage
//!
//! Provides:
//! - `MonitorStore` bound to a single JSON file
//! - Atomic writes via temp→rename
//! - Claim-by-rename reads so content is handed out once

mod atomic;
mod monitor_store;

pub use monitor_store::MonitorStore;
