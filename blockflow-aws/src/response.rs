//! Helpers for shaping SDK responses into JSON event payloads.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{Map, Value};

/// Extension trait for building response maps that omit absent fields.
///
/// SDK response members are mostly optional; skipping the `None` ones means
/// a response with nothing populated serializes as `{}`.
pub trait MapExt {
    fn insert_some<T: Into<Value>>(&mut self, key: &str, value: Option<T>);
}

impl MapExt for Map<String, Value> {
    fn insert_some<T: Into<Value>>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.insert(key.to_string(), value.into());
        }
    }
}

/// Encodes raw response bytes as a base64 JSON string.
pub fn encode_bytes(bytes: &[u8]) -> Value {
    Value::String(STANDARD.encode(bytes))
}

/// Decodes a binary payload into JSON when it parses as such, falling back
/// to a base64 string otherwise.
pub fn body_value(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|_| encode_bytes(bytes))
}
