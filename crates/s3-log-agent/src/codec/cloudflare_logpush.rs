// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use chrono::DateTime;
use gelf_transport::GelfMessage;
use serde_json::Value;

use crate::codec::now_epoch_seconds;
use crate::config::Config;
use crate::error::CodecError;

/// Fields re-encoded to epoch seconds under their original key.
const TIMESTAMP_FIELDS: [&str; 2] = ["EdgeEndTimestamp", "EdgeStartTimestamp"];

/// Fields that get a derived `<name>Class` companion ("1xx".."5xx").
const HTTP_STATUS_FIELDS: [&str; 3] = [
    "CacheResponseStatus",
    "EdgeResponseStatus",
    "OriginResponseStatus",
];

/// Field carrying the origin response time in nanoseconds.
const ORIGIN_RESPONSE_TIME_FIELD: &str = "OriginResponseTime";

/// The field driving the message timestamp.
const START_TIMESTAMP_FIELD: &str = "EdgeStartTimestamp";

const NANOS_PER_SECOND: f64 = 1_000_000_000.0;
const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Decodes Cloudflare Logpush access log lines.
///
/// Each line is a flat JSON object. The summary is assembled from the
/// configured summary fields, the message timestamp from
/// `EdgeStartTimestamp`, and each retained field is copied with the
/// timestamp/status-class/response-time transforms applied. Array-valued
/// fields (the FirewallMatches* lists) are not surfaced.
pub struct CloudflareLogpushCodec {
    config: Arc<Config>,
}

impl CloudflareLogpushCodec {
    pub fn new(config: Arc<Config>) -> Self {
        CloudflareLogpushCodec { config }
    }

    pub fn decode(&self, line: &str) -> Result<GelfMessage, CodecError> {
        let root: Value = serde_json::from_str(line)
            .map_err(|e| CodecError::MalformedInput(e.to_string()))?;
        let object = root.as_object().ok_or_else(|| {
            CodecError::MalformedInput("expected a top-level JSON object".to_string())
        })?;

        // Message summary from the configured fields, in configured order.
        let mut summary_parts = Vec::new();
        for name in &self.config.message_summary_fields {
            match object.get(name) {
                Some(value) => {
                    summary_parts.push(format!("{name}: {}", render_summary_value(value)));
                }
                None if self.config.require_summary_fields => {
                    return Err(CodecError::MissingRequiredField(name.clone()));
                }
                None => {}
            }
        }
        let summary = summary_parts.join(" | ");

        let mut message = GelfMessage::with_host(summary, &self.config.graylog_host);

        // Message timestamp, unless pinned to the decode time.
        if self.config.use_now_timestamp {
            message.set_timestamp(now_epoch_seconds());
        } else {
            match object.get(START_TIMESTAMP_FIELD) {
                Some(node) => message.set_timestamp(parse_timestamp(node)?),
                None => message.set_timestamp(now_epoch_seconds()),
            }
        }

        for (key, node) in object {
            // An empty allow-list means all fields are included.
            if !self.config.message_fields.is_empty()
                && !self.config.message_fields.iter().any(|field| field == key)
            {
                continue;
            }

            // Nested values are not surfaced; see the FirewallMatches* lists
            // in real payloads.
            if node.is_array() || node.is_object() {
                continue;
            }

            if TIMESTAMP_FIELDS.contains(&key.as_str()) {
                message.add_additional_field(key, parse_timestamp(node)?);
                continue;
            }

            if HTTP_STATUS_FIELDS.contains(&key.as_str()) {
                if let Some(class) = status_class(node) {
                    message.add_additional_field(&format!("{key}Class"), class);
                }
            }

            if key == ORIGIN_RESPONSE_TIME_FIELD {
                if let Some(nanos) = node.as_f64() {
                    message.add_additional_field(
                        &format!("{key}Millis"),
                        nanos / NANOS_PER_MILLI,
                    );
                }
            }

            message.add_additional_field(key, node.clone());
        }

        Ok(message)
    }
}

/// Renders a summary value the way it reads in the source payload.
fn render_summary_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Decodes one of the three timestamp encodings to epoch seconds.
///
/// Strings are RFC 3339; integers within 32-bit range are Unix seconds;
/// wider integers are Unix nanoseconds.
fn parse_timestamp(node: &Value) -> Result<f64, CodecError> {
    match node {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|timestamp| timestamp.timestamp() as f64)
            .map_err(|e| {
                CodecError::MalformedInput(format!("invalid RFC 3339 timestamp [{text}]: {e}"))
            }),
        Value::Number(number) => {
            let raw = number.as_i64().ok_or_else(|| {
                CodecError::MalformedInput(format!("invalid timestamp value [{number}]"))
            })?;
            if i32::try_from(raw).is_ok() {
                Ok(raw as f64)
            } else {
                Ok(raw as f64 / NANOS_PER_SECOND)
            }
        }
        other => Err(CodecError::MalformedInput(format!(
            "invalid timestamp type [{other}]; expected a string or an integer"
        ))),
    }
}

/// Maps an HTTP status to its 100-wide class, or `None` outside [100, 600).
fn status_class(node: &Value) -> Option<&'static str> {
    match node.as_i64()? {
        100..=199 => Some("1xx"),
        200..=299 => Some("2xx"),
        300..=399 => Some("3xx"),
        400..=499 => Some("4xx"),
        500..=599 => Some("5xx"),
        _ => None,
    }
}
