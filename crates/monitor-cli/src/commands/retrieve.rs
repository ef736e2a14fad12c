//! Retrieve command
//!
//! Usage: monitor retrieve

use monitor_store::MonitorStore;
use std::io::Write;

use super::Context;

/// Write stored bytes to stdout unchanged; nothing is printed when empty
pub fn execute(context: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let store = MonitorStore::new(&context.store_path);

    if let Some(data) = store.retrieve_entry_data()? {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&data)?;
        stdout.flush()?;
    } else {
        tracing::debug!(path = %context.store_path.display(), "no entry data");
    }
    Ok(())
}
