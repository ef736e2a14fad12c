//! Monitor CLI
//!
//! Command-line interface for the file-backed monitor entry store

use clap::{Parser, Subcommand, ValueEnum};
use monitor_core::logging_facility::{self, Profile};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "monitor")]
#[command(about = "Monitor - park, retrieve and flush monitoring entries", long_about = None)]
struct Cli {
    /// JSON file holding parked entries
    #[arg(
        long,
        global = true,
        env = "MONITOR_STORE_PATH",
        default_value = ".monitor/entries.json"
    )]
    store: PathBuf,

    /// Application identifier stamped on entries and flush payloads
    #[arg(long, global = true, env = "MONITOR_APP_ID")]
    app_id: Option<String>,

    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogProfile::Dev)]
    log_profile: LogProfile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogProfile {
    Dev,
    Prod,
}

impl From<LogProfile> for Profile {
    fn from(profile: LogProfile) -> Self {
        match profile {
            LogProfile::Dev => Profile::Development,
            LogProfile::Prod => Profile::Production,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Overwrite the store with a JSON array of objects
    Persist(commands::persist::PersistArgs),
    /// Print stored entry data and clear the store
    Retrieve,
    /// Record one entry into the store
    Record(commands::record::RecordArgs),
    /// Print the flush payload for all stored entries and clear the store
    Flush,
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile.into());

    let context = commands::Context {
        store_path: cli.store,
        app_id: cli.app_id,
    };

    let result = match cli.command {
        Commands::Persist(args) => commands::persist::execute(&context, args),
        Commands::Retrieve => commands::retrieve::execute(&context),
        Commands::Record(args) => commands::record::execute(&context, args),
        Commands::Flush => commands::flush::execute(&context),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
