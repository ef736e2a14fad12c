//! Entry model
//!
//! An entry is anything that can present itself as a JSON object. The store
//! writes entries as one JSON array and hands the raw text back on retrieval;
//! `decode_entry_data` turns that text into dictionaries again.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::{MonitorError, Result};

/// JSON object representation of one entry
pub type Dictionary = Map<String, Value>;

/// Values that can be converted to a JSON object
///
/// Each entry type owns its conversion; the store only serializes the
/// resulting dictionaries.
pub trait DictionaryRepresentable {
    /// Build the JSON object for this value
    ///
    /// # Errors
    ///
    /// `Serialization` when the value has no object representation.
    fn dictionary_representation(&self) -> Result<Dictionary>;
}

impl DictionaryRepresentable for Dictionary {
    fn dictionary_representation(&self) -> Result<Dictionary> {
        Ok(self.clone())
    }
}

impl DictionaryRepresentable for Value {
    fn dictionary_representation(&self) -> Result<Dictionary> {
        match self {
            Value::Object(map) => Ok(map.clone()),
            other => Err(MonitorError::EntryNotObject {
                found: json_type_name(other).to_string(),
            }
            .into()),
        }
    }
}

impl<T: DictionaryRepresentable + ?Sized> DictionaryRepresentable for &T {
    fn dictionary_representation(&self) -> Result<Dictionary> {
        (**self).dictionary_representation()
    }
}

/// Convert any serializable value into a dictionary
///
/// # Errors
///
/// `Serialization` if serde fails or the value does not serialize to an object.
pub fn to_dictionary<T: Serialize + ?Sized>(value: &T) -> Result<Dictionary> {
    let value = serde_json::to_value(value).map_err(MonitorError::from)?;
    value.dictionary_representation()
}

/// Decode bytes previously written by the store
///
/// # Errors
///
/// `Serialization` when the bytes are not UTF-8 JSON, or not an array of objects.
pub fn decode_entry_data(bytes: &[u8]) -> Result<Vec<Dictionary>> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| MonitorError::EntryDataMalformed {
        reason: e.to_string(),
    })?;

    let Value::Array(items) = value else {
        return Err(MonitorError::EntryDataMalformed {
            reason: format!("expected array, found {}", json_type_name(&value)),
        }
        .into());
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(MonitorError::EntryDataMalformed {
                reason: format!("element {} is {}", index, json_type_name(&other)),
            }
            .into()),
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
