// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde_json::{Map, Value};

const GELF_VERSION: &str = "1.1";
const DEFAULT_HOST: &str = "localhost";

/// A single GELF 1.1 message.
///
/// Additional fields hold scalar JSON values only; producers are responsible
/// for flattening or dropping nested structures before adding them.
#[derive(Debug, Clone, PartialEq)]
pub struct GelfMessage {
    short_message: String,
    host: String,
    timestamp: Option<f64>,
    additional_fields: Map<String, Value>,
}

impl GelfMessage {
    pub fn new(short_message: impl Into<String>) -> Self {
        GelfMessage {
            short_message: short_message.into(),
            host: DEFAULT_HOST.to_string(),
            timestamp: None,
            additional_fields: Map::new(),
        }
    }

    pub fn with_host(short_message: impl Into<String>, host: impl Into<String>) -> Self {
        GelfMessage {
            short_message: short_message.into(),
            host: host.into(),
            timestamp: None,
            additional_fields: Map::new(),
        }
    }

    pub fn short_message(&self) -> &str {
        &self.short_message
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Message timestamp in fractional epoch seconds.
    pub fn timestamp(&self) -> Option<f64> {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, epoch_seconds: f64) {
        self.timestamp = Some(epoch_seconds);
    }

    pub fn add_additional_field(&mut self, key: &str, value: impl Into<Value>) {
        self.additional_fields.insert(key.to_string(), value.into());
    }

    pub fn additional_fields(&self) -> &Map<String, Value> {
        &self.additional_fields
    }

    /// Encodes the message as a GELF JSON payload.
    ///
    /// Additional fields are written with the `_` prefix the protocol
    /// requires. The timestamp is omitted when unset, leaving it to the
    /// collector to stamp arrival time.
    pub fn to_wire_json(&self) -> String {
        let mut payload = Map::new();
        payload.insert("version".to_string(), Value::from(GELF_VERSION));
        payload.insert("host".to_string(), Value::from(self.host.as_str()));
        payload.insert(
            "short_message".to_string(),
            Value::from(self.short_message.as_str()),
        );
        if let Some(timestamp) = self.timestamp {
            payload.insert("timestamp".to_string(), Value::from(timestamp));
        }
        for (key, value) in &self.additional_fields {
            payload.insert(format!("_{key}"), value.clone());
        }
        Value::Object(payload).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_json_contains_required_fields() {
        let mut message = GelfMessage::with_host("hello", "example.org");
        message.set_timestamp(1568406189.25);
        message.add_additional_field("port", 8080);
        message.add_additional_field("secure", true);
        message.add_additional_field("path", "/search");

        let wire: Value = serde_json::from_str(&message.to_wire_json()).unwrap();
        assert_eq!(wire["version"], "1.1");
        assert_eq!(wire["host"], "example.org");
        assert_eq!(wire["short_message"], "hello");
        assert_eq!(wire["timestamp"], 1568406189.25);
        assert_eq!(wire["_port"], 8080);
        assert_eq!(wire["_secure"], true);
        assert_eq!(wire["_path"], "/search");
    }

    #[test]
    fn test_wire_json_omits_unset_timestamp() {
        let message = GelfMessage::new("no timestamp");
        let wire: Value = serde_json::from_str(&message.to_wire_json()).unwrap();
        assert!(wire.get("timestamp").is_none());
        assert_eq!(wire["host"], "localhost");
    }

    #[test]
    fn test_additional_fields_preserve_scalar_types() {
        let mut message = GelfMessage::new("types");
        message.add_additional_field("count", 42);
        message.add_additional_field("ratio", 2.48);
        message.add_additional_field("flag", false);

        let fields = message.additional_fields();
        assert_eq!(fields["count"], Value::from(42));
        assert_eq!(fields["ratio"], Value::from(2.48));
        assert_eq!(fields["flag"], Value::from(false));
    }
}
