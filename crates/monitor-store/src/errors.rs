//! Error handling for monitor-store
//!
//! Wraps monitor-core ExError with store-specific helpers

use monitor_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error for a store operation on `path`
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Create a serialization error for a store operation on `path`
pub fn serialization_error(operation: &str, path: &Path, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Create a lock error for a store whose guard was poisoned
pub fn lock_poisoned(path: &Path) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op("store_lock")
        .with_path(path.display().to_string())
        .with_message("Store lock poisoned by a panicking holder")
}
