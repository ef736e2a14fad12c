//! Record command
//!
//! Usage:
//!   monitor record method-usage --method <NAME>
//!   monitor record performance --name <NAME> --start-ms <MS> --end-ms <MS>
//!
//! Parked entries are restored, the new entry is appended, and everything is
//! parked again. If that last park fails the entries are printed to stdout
//! as a JSON array so they can be persisted by hand.

use chrono::{DateTime, TimeZone, Utc};
use clap::{Args, Subcommand};
use monitor_core::entry::DictionaryRepresentable;
use monitor_core::ops::NoopEntrySink;
use monitor_core::{EntryEnvelope, MethodUsageEntry, PerformanceEntry};
use monitor_engine::{Monitor, MonitorConfig};
use monitor_store::MonitorStore;

use super::{ensure_store_dir, park_or_dump, Context};

#[derive(Debug, Args)]
pub struct RecordArgs {
    #[command(subcommand)]
    pub command: RecordCommand,

    /// Device OS version added to the entry
    #[arg(long, global = true)]
    pub device_os_version: Option<String>,

    /// Device model added to the entry
    #[arg(long, global = true)]
    pub device_model: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// A public method was called
    MethodUsage {
        #[arg(long)]
        method: String,
    },
    /// A timed operation finished
    Performance {
        #[arg(long)]
        name: String,

        /// Start, unix milliseconds
        #[arg(long)]
        start_ms: i64,

        /// End, unix milliseconds
        #[arg(long)]
        end_ms: i64,
    },
}

pub fn execute(context: &Context, args: RecordArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Build the entry first so a bad sample leaves parked entries on disk
    let envelope = envelope_for(context, &args);
    let entry = match args.command {
        RecordCommand::MethodUsage { method } => {
            MethodUsageEntry::with_envelope(envelope, method).dictionary_representation()?
        }
        RecordCommand::Performance {
            name,
            start_ms,
            end_ms,
        } => PerformanceEntry::with_envelope(
            envelope,
            name,
            from_millis(start_ms)?,
            from_millis(end_ms)?,
        )?
        .dictionary_representation()?,
    };

    ensure_store_dir(&context.store_path)?;

    // Auto flush would hand entries to the noop sink and lose them
    let config = MonitorConfig::default().with_flush_limit(0);
    let monitor = Monitor::new(
        MonitorStore::new(&context.store_path),
        NoopEntrySink,
        config,
    );
    monitor.enable()?;
    monitor.record(&entry)?;

    // Restored entries only live in memory now
    let parked = park_or_dump(&monitor, &mut std::io::stdout().lock())?;
    eprintln!("✓ Recorded ({} entries parked)", parked);
    Ok(())
}

fn envelope_for(context: &Context, args: &RecordArgs) -> EntryEnvelope {
    // Event name is replaced by the entry constructor
    let mut envelope = EntryEnvelope::new("");
    envelope.app_id = context.app_id.clone();
    envelope.device_os_version = args.device_os_version.clone();
    envelope.device_model = args.device_model.clone();
    envelope
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>, String> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| format!("timestamp out of range: {}", ms))
}
