use chrono::{DateTime, Utc};
use serde::Serialize;

use super::EntryEnvelope;
use crate::entry::{to_dictionary, Dictionary, DictionaryRepresentable};
use crate::errors::{MonitorError, Result};

/// Timing sample for a named operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceEntry {
    #[serde(flatten)]
    pub envelope: EntryEnvelope,
    pub name: String,
    /// Unix seconds of the sample start
    pub time_start: i64,
    /// Milliseconds between start and end
    pub time_spent: i64,
}

impl PerformanceEntry {
    pub const EVENT_NAME: &'static str = "performance";

    /// Build a sample from its start and end instants
    ///
    /// # Errors
    ///
    /// `InvalidInput` when `end` is before `start`.
    pub fn new(name: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        Self::with_envelope(EntryEnvelope::new(Self::EVENT_NAME), name, start, end)
    }

    /// Use a prepared envelope; its event name is forced to `performance`
    ///
    /// # Errors
    ///
    /// `InvalidInput` when `end` is before `start`.
    pub fn with_envelope(
        mut envelope: EntryEnvelope,
        name: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self> {
        let name = name.into();
        let spent = end.signed_duration_since(start).num_milliseconds();
        if spent < 0 {
            return Err(MonitorError::NegativeDuration {
                name,
                start_ms: start.timestamp_millis(),
                end_ms: end.timestamp_millis(),
            }
            .into());
        }

        envelope.event_name = Self::EVENT_NAME.to_string();
        Ok(Self {
            envelope,
            name,
            time_start: start.timestamp(),
            time_spent: spent,
        })
    }
}

impl DictionaryRepresentable for PerformanceEntry {
    fn dictionary_representation(&self) -> Result<Dictionary> {
        to_dictionary(self)
    }
}
