// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use gelf_transport::GelfMessage;
use serde_json::{Map, Value};

use crate::codec::now_epoch_seconds;
use crate::error::CodecError;

const SEPARATOR: char = '_';

/// Flattens arbitrary JSON into one field per leaf scalar.
///
/// Object keys are joined with an underscore, array elements keyed by a
/// bracketed index, so `{"a":{"b":[1,2]}}` yields `a_b[0]` and `a_b[1]`. An
/// alternative is the text/plain content type with extraction rules on the
/// collector side.
pub struct ApplicationJsonCodec;

impl ApplicationJsonCodec {
    pub fn decode(&self, line: &str) -> Result<GelfMessage, CodecError> {
        let root: Value = serde_json::from_str(line)
            .map_err(|e| CodecError::MalformedInput(e.to_string()))?;

        let mut fields = Map::new();
        flatten_into(&mut fields, "", &root);

        let mut message = GelfMessage::new(line);
        message.set_timestamp(now_epoch_seconds());
        for (key, value) in fields {
            message.add_additional_field(&key, value);
        }
        Ok(message)
    }
}

/// Depth-first fold of the JSON tree into underscore-joined scalar keys.
fn flatten_into(fields: &mut Map<String, Value>, path: &str, value: &Value) {
    match value {
        Value::Object(entries) => {
            for (key, child) in entries {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}{SEPARATOR}{key}")
                };
                flatten_into(fields, &child_path, child);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(fields, &format!("{path}[{index}]"), child);
            }
        }
        scalar => {
            let key = if path.is_empty() {
                // A bare scalar document has no path to name it by.
                "root".to_string()
            } else {
                path.to_string()
            };
            fields.insert(key, scalar.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_objects_are_flattened() {
        let json = r#"{
            "eventVersion": "1.0",
            "userIdentity": {
                "type": "IAMUser",
                "userName": "Alice"
            },
            "userAgent": "aws-cli/1.3.2 Python/2.7.5 Windows/7",
            "responseElements": {"user": {"userName": "Bob"}}
        }"#;

        let message = ApplicationJsonCodec.decode(json).unwrap();
        let fields = message.additional_fields();
        assert_eq!(fields["userAgent"], "aws-cli/1.3.2 Python/2.7.5 Windows/7");
        assert_eq!(fields["userIdentity_type"], "IAMUser");
        assert_eq!(fields["responseElements_user_userName"], "Bob");
        assert_eq!(message.short_message(), json);
    }

    #[test]
    fn test_arrays_use_indexed_keys() {
        let json = r#"{
            "Records": [
                {"eventVersion": "1.0"},
                {"eventVersion": "4.0"},
                {"eventVersion": "2.0"}
            ]
        }"#;

        let message = ApplicationJsonCodec.decode(json).unwrap();
        let fields = message.additional_fields();
        assert_eq!(fields["Records[0]_eventVersion"], "1.0");
        assert_eq!(fields["Records[1]_eventVersion"], "4.0");
        assert_eq!(fields["Records[2]_eventVersion"], "2.0");
    }

    #[test]
    fn test_every_leaf_becomes_exactly_one_field() {
        let json = r#"{"a":{"b":1,"c":[true,"x",2.5]},"d":null}"#;
        let message = ApplicationJsonCodec.decode(json).unwrap();
        let fields = message.additional_fields();

        assert_eq!(fields.len(), 5);
        assert_eq!(fields["a_b"], 1);
        assert_eq!(fields["a_c[0]"], true);
        assert_eq!(fields["a_c[1]"], "x");
        assert_eq!(fields["a_c[2]"], 2.5);
        assert_eq!(fields["d"], Value::Null);
    }

    #[test]
    fn test_scalar_types_are_preserved() {
        let message = ApplicationJsonCodec
            .decode(r#"{"count":42,"ratio":0.5,"on":false,"name":"x"}"#)
            .unwrap();
        let fields = message.additional_fields();
        assert!(fields["count"].is_i64());
        assert!(fields["ratio"].is_f64());
        assert!(fields["on"].is_boolean());
        assert!(fields["name"].is_string());
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let result = ApplicationJsonCodec.decode("{not json");
        assert!(matches!(result, Err(CodecError::MalformedInput(_))));
    }

    #[test]
    fn test_top_level_array() {
        let message = ApplicationJsonCodec.decode(r#"["a","b"]"#).unwrap();
        let fields = message.additional_fields();
        assert_eq!(fields["[0]"], "a");
        assert_eq!(fields["[1]"], "b");
    }
}
