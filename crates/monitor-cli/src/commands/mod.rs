//! Subcommand implementations

use std::io::Write;
use std::path::{Path, PathBuf};

use monitor_core::errors::Result;
use monitor_core::ops::{EntryPersistence, EntrySink};
use monitor_engine::Monitor;

pub mod flush;
pub mod persist;
pub mod record;
pub mod retrieve;

/// Settings shared by every subcommand
#[derive(Debug)]
pub struct Context {
    pub store_path: PathBuf,
    pub app_id: Option<String>,
}

/// Create the store's parent directory; the store itself never does
pub(crate) fn ensure_store_dir(store_path: &Path) -> std::io::Result<()> {
    match store_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Park the buffer, or write it to `out` when parking fails
///
/// Entries restored by `enable` are no longer on disk, so a failed park
/// would otherwise drop them with the process. They are printed as one JSON
/// array line and the park error is still returned.
///
/// # Errors
///
/// The park error.
pub(crate) fn park_or_dump<P, S, W>(monitor: &Monitor<P, S>, out: &mut W) -> Result<usize>
where
    P: EntryPersistence,
    S: EntrySink,
    W: Write,
{
    let park_err = match monitor.park() {
        Ok(parked) => return Ok(parked),
        Err(e) => e,
    };

    let entries = monitor.drain()?;
    if entries.is_empty() {
        return Err(park_err);
    }

    match serde_json::to_string(&entries) {
        Ok(text) => match writeln!(out, "{}", text) {
            Ok(()) => {
                tracing::warn!(entry_count = entries.len(), "could not park entries, printed them instead")
            }
            Err(e) => tracing::error!(entry_count = entries.len(), error = %e, "unparked entries lost"),
        },
        Err(e) => tracing::error!(entry_count = entries.len(), error = %e, "unparked entries lost"),
    }
    Err(park_err)
}
