//! Flush command
//!
//! Usage: monitor flush
//!
//! Restores parked entries and prints the flush payload as one JSON line.
//! When printing fails the entries are parked again, or written to stderr
//! if that fails too.

use monitor_core::entry::Dictionary;
use monitor_core::errors::{ExError, ExErrorKind, Result};
use monitor_core::ops::EntrySink;
use monitor_engine::{build_payload, Monitor, MonitorConfig};
use monitor_store::MonitorStore;
use std::io::Write;

use super::{park_or_dump, Context};

/// Prints each batch as a payload line on stdout
struct StdoutSink {
    app_id: Option<String>,
}

impl EntrySink for StdoutSink {
    fn send(&self, entries: &[Dictionary]) -> Result<()> {
        let payload = build_payload(self.app_id.as_deref(), entries)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", payload).map_err(|e| {
            ExError::new(ExErrorKind::ExternalService)
                .with_op("stdout_sink")
                .with_message(e.to_string())
        })
    }
}

pub fn execute(context: &Context) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut config = MonitorConfig::default().with_flush_limit(0);
    config.app_id = context.app_id.clone();

    let monitor = Monitor::new(
        MonitorStore::new(&context.store_path),
        StdoutSink {
            app_id: config.app_id.clone(),
        },
        config,
    );

    let restored = monitor.enable()?;
    if let Err(e) = monitor.flush() {
        // Put the entries back where they came from
        let reparked = park_or_dump(&monitor, &mut std::io::stderr());
        if let Err(park_err) = reparked {
            tracing::error!(error = %park_err, "could not re-park entries after failed flush");
        }
        return Err(e.into());
    }

    tracing::debug!(entry_count = restored, "flushed parked entries");
    Ok(())
}
