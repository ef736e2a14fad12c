//! Monitor configuration

/// Buffer size at which `record` flushes on its own
pub const DEFAULT_FLUSH_LIMIT: usize = 100;

/// Tunables for a `Monitor`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Flush automatically once this many entries are buffered.
    /// Zero disables automatic flushing.
    pub flush_limit: usize,
    /// Application identifier added to flush payloads
    pub app_id: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            flush_limit: DEFAULT_FLUSH_LIMIT,
            app_id: None,
        }
    }
}

impl MonitorConfig {
    pub fn with_flush_limit(mut self, flush_limit: usize) -> Self {
        self.flush_limit = flush_limit;
        self
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }
}
