use serde::Serialize;

use super::EntryEnvelope;
use crate::entry::{to_dictionary, Dictionary, DictionaryRepresentable};
use crate::errors::Result;

/// Records that a public method was invoked
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodUsageEntry {
    #[serde(flatten)]
    pub envelope: EntryEnvelope,
    pub method: String,
}

impl MethodUsageEntry {
    pub const EVENT_NAME: &'static str = "method_usage";

    pub fn new(method: impl Into<String>) -> Self {
        Self::with_envelope(EntryEnvelope::new(Self::EVENT_NAME), method)
    }

    /// Use a prepared envelope; its event name is forced to `method_usage`
    pub fn with_envelope(mut envelope: EntryEnvelope, method: impl Into<String>) -> Self {
        envelope.event_name = Self::EVENT_NAME.to_string();
        Self {
            envelope,
            method: method.into(),
        }
    }
}

impl DictionaryRepresentable for MethodUsageEntry {
    fn dictionary_representation(&self) -> Result<Dictionary> {
        to_dictionary(self)
    }
}
