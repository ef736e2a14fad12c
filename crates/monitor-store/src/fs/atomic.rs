//! Atomic write primitives
//!
//! Uses temp→rename in the target's own directory so readers see either the
//! old file or the complete new one, never a partial write.

use crate::errors::{io_error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension appended to the file name while a write is in flight
pub(crate) const TEMP_SUFFIX: &str = ".tmp";

/// `<dir>/<file name><suffix>` next to `target`
pub(crate) fn sibling_path(target: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    target.with_file_name(name)
}

/// Atomically replace the file at `target_path` with `content`
///
/// The parent directory must already exist. On failure the temp file is
/// removed and the previous content of `target_path` is left untouched.
pub(crate) fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = sibling_path(target_path, TEMP_SUFFIX);

    if let Err(e) = fs::write(&temp_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("write_temp", target_path, e));
    }

    if let Err(e) = fs::rename(&temp_path, target_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("rename_temp", target_path, e));
    }

    Ok(())
}
