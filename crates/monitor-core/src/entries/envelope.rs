use chrono::{DateTime, Utc};
use serde::Serialize;

/// Fields common to every monitor entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryEnvelope {
    pub event_name: String,
    /// Unix seconds
    pub time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_os_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_model: Option<String>,
}

impl EntryEnvelope {
    /// Envelope stamped with the current time
    pub fn new(event_name: impl Into<String>) -> Self {
        Self::at(event_name, Utc::now())
    }

    /// Envelope stamped with an explicit time
    pub fn at(event_name: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            event_name: event_name.into(),
            time: time.timestamp(),
            app_id: None,
            device_os_version: None,
            device_model: None,
        }
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn with_device_os_version(mut self, version: impl Into<String>) -> Self {
        self.device_os_version = Some(version.into());
        self
    }

    pub fn with_device_model(mut self, model: impl Into<String>) -> Self {
        self.device_model = Some(model.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::to_dictionary;
    use chrono::TimeZone;

    #[test]
    fn test_optional_fields_are_omitted() {
        let time = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let dict = to_dictionary(&EntryEnvelope::at("method_usage", time)).unwrap();

        assert_eq!(dict.len(), 2);
        assert_eq!(dict["event_name"], "method_usage");
        assert_eq!(dict["time"], 1_700_000_000);
    }

    #[test]
    fn test_builder_sets_device_fields() {
        let envelope = EntryEnvelope::new("performance")
            .with_app_id("123")
            .with_device_os_version("14.2")
            .with_device_model("x86_64");
        let dict = to_dictionary(&envelope).unwrap();

        assert_eq!(dict["app_id"], "123");
        assert_eq!(dict["device_os_version"], "14.2");
        assert_eq!(dict["device_model"], "x86_64");
    }
}
