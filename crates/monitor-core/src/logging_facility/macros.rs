//! Operation lifecycle macros
//!
//! Every public monitor operation emits one `start` event and then exactly
//! one of `end` or `end_error`, keyed by `op`. The field names come from
//! `monitor_core_types::schema`; extra fields such as `entry_count`,
//! `pending` or `path` are appended as plain `tracing` fields.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use monitor_core::log_op_start;
/// # use std::path::Path;
/// let store = Path::new("/tmp/entries.json");
/// log_op_start!("monitor_enable");
/// log_op_start!("monitor_park", path = %store.display(), pending = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__op_event!(info, $op, EVENT_START $(, $($field)*)?)
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// `duration_ms` is required and must come first.
///
/// ```
/// # use monitor_core::log_op_end;
/// log_op_end!("monitor_park", duration_ms = 3, entry_count = 2);
/// log_op_end!("monitor_record", duration_ms = 0, pending = 17);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__op_event!(info, $op, EVENT_END, duration_ms = $duration $(, $($field)*)?)
    };
}

/// Log an operation error
///
/// The error is converted into `ExError` so the event carries `err.kind`
/// and a stable `err.code` (`ERR_IO`, `ERR_SERIALIZATION`, ...).
///
/// # Example
///
/// ```
/// # use monitor_core::{log_op_error, errors::MonitorError};
/// # use monitor_core::errors::{ExError, ExErrorKind};
/// let err = MonitorError::EntryNotObject { found: "array".to_string() };
/// log_op_error!("monitor_record", err, duration_ms = 1);
///
/// let io = ExError::new(ExErrorKind::Io)
///     .with_op("persist")
///     .with_path("/tmp/missing/entries.json");
/// log_op_error!("monitor_park", io, duration_ms = 2, entry_count = 5);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__op_event!(
            error,
            $op,
            EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code()
            $(, $($field)*)?
        )
    }};
}

/// Shared event shape behind the lifecycle macros
#[doc(hidden)]
#[macro_export]
macro_rules! __op_event {
    ($level:ident, $op:expr, $event:ident $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::monitor_core_types::schema::$event,
            $($($field)*)?
        )
    };
}
