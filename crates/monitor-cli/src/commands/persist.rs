//! Persist command
//!
//! Usage: monitor persist [--input <FILE>]

use clap::Args;
use monitor_store::MonitorStore;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;

use super::{ensure_store_dir, Context};

#[derive(Debug, Args)]
pub struct PersistArgs {
    /// File with a JSON array of objects (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<PathBuf>,
}

pub fn execute(context: &Context, args: PersistArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    let entries: Vec<Value> = serde_json::from_str(&text)
        .map_err(|e| format!("input must be a JSON array: {}", e))?;

    ensure_store_dir(&context.store_path)?;
    MonitorStore::new(&context.store_path).persist(&entries)?;

    eprintln!(
        "✓ Persisted {} entries to {}",
        entries.len(),
        context.store_path.display()
    );
    Ok(())
}
