//! Flush payload encoding

use monitor_core::entry::Dictionary;
use monitor_core::errors::{MonitorError, Result};
use serde_json::{json, Value};

/// Body of a flush: `{"monitorings": "<JSON array text>"}` plus `app_id`
///
/// The entries travel as a JSON string so the receiver gets the exact text
/// the store would have written.
///
/// # Errors
///
/// `Serialization` if the entries cannot be encoded.
pub fn build_payload(app_id: Option<&str>, entries: &[Dictionary]) -> Result<Value> {
    let monitorings = serde_json::to_string(entries).map_err(MonitorError::from)?;
    let mut payload = json!({ "monitorings": monitorings });
    if let Some(app_id) = app_id {
        payload["app_id"] = Value::from(app_id);
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_embeds_array_text() {
        let mut entry = Dictionary::new();
        entry.insert("a".to_string(), Value::from(1));

        let payload = build_payload(Some("123"), &[entry]).unwrap();

        assert_eq!(payload["monitorings"], "[{\"a\":1}]");
        assert_eq!(payload["app_id"], "123");
    }

    #[test]
    fn test_payload_without_app_id() {
        let payload = build_payload(None, &[]).unwrap();

        assert_eq!(payload["monitorings"], "[]");
        assert!(payload.get("app_id").is_none());
    }
}
