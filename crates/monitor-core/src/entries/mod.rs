//! Monitor entry types
//!
//! Every entry shares an envelope (event name, time, app and device info)
//! and adds its own payload fields on top of it.

mod envelope;
mod method_usage;
mod performance;

pub use envelope::EntryEnvelope;
pub use method_usage::MethodUsageEntry;
pub use performance::PerformanceEntry;
