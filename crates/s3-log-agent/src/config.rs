// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::str::FromStr;

use crate::compression::CompressionType;
use crate::content_type::ContentType;
use crate::error::ConfigError;
use crate::protocol::ProtocolType;

// Environment variables with these names can be defined on the function to
// override the defaults.
const GRAYLOG_HOST: &str = "GRAYLOG_HOST";
const GRAYLOG_PORT: &str = "GRAYLOG_PORT";
const CONNECT_TIMEOUT: &str = "CONNECT_TIMEOUT";
const RECONNECT_DELAY: &str = "RECONNECT_DELAY";
const TCP_NO_DELAY: &str = "TCP_NO_DELAY";
const TCP_QUEUE_SIZE: &str = "TCP_QUEUE_SIZE";
const TCP_MAX_IN_FLIGHT_SENDS: &str = "TCP_MAX_IN_FLIGHT_SENDS";
const CONTENT_TYPE: &str = "CONTENT_TYPE";
const COMPRESSION_TYPE: &str = "COMPRESSION_TYPE";
const PROTOCOL_TYPE: &str = "PROTOCOL_TYPE";
const SHUTDOWN_FLUSH_TIMEOUT_MS: &str = "SHUTDOWN_FLUSH_TIMEOUT_MS";
const SHUTDOWN_FLUSH_RETRIES: &str = "SHUTDOWN_FLUSH_RETRIES";
const LOGPUSH_USE_NOW_TIMESTAMP: &str = "CLOUDFLARE_LOGPUSH_USE_NOW_TIMESTAMP";
const LOGPUSH_MESSAGE_FIELDS: &str = "CLOUDFLARE_LOGPUSH_MESSAGE_FIELDS";
const LOGPUSH_MESSAGE_SUMMARY_FIELDS: &str = "CLOUDFLARE_LOGPUSH_MESSAGE_SUMMARY_FIELDS";
const LOGPUSH_REQUIRE_SUMMARY_FIELDS: &str = "CLOUDFLARE_LOGPUSH_REQUIRE_SUMMARY_FIELDS";
const S3_ENDPOINT: &str = "S3_ENDPOINT";
const AWS_REGION: &str = "AWS_REGION";
const LOG_LEVEL: &str = "LOG_LEVEL";

const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_RECONNECT_DELAY_MS: u64 = 10_000;
const DEFAULT_TCP_QUEUE_SIZE: usize = 512;
const DEFAULT_TCP_MAX_IN_FLIGHT_SENDS: usize = 512;
const DEFAULT_SHUTDOWN_FLUSH_TIMEOUT_MS: u64 = 100;
const DEFAULT_SHUTDOWN_FLUSH_RETRIES: u32 = 6_000;
const DEFAULT_AWS_REGION: &str = "us-east-1";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_MESSAGE_SUMMARY_FIELDS: &str =
    "ClientRequestHost,ClientRequestPath,OriginIP,ClientSrcPort,EdgeServerIP,EdgeResponseBytes";

/// Resolved configuration for one forwarder process.
///
/// Loaded once from environment variables at startup and shared read-only as
/// `Arc<Config>`; there is no ambient global lookup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GELF collector host.
    pub graylog_host: String,
    /// GELF collector port.
    pub graylog_port: u16,
    pub connect_timeout_ms: u64,
    pub reconnect_delay_ms: u64,
    pub tcp_no_delay: bool,
    /// Transport queue depth.
    pub queue_size: usize,
    /// Frames written between explicit socket flushes.
    pub max_in_flight_sends: usize,
    pub content_type: ContentType,
    pub compression_type: CompressionType,
    pub protocol_type: ProtocolType,
    /// Per-poll sleep while waiting for the transport queue to drain.
    pub shutdown_flush_timeout_ms: u64,
    /// Poll budget while waiting for the transport queue to drain.
    pub shutdown_flush_retries: u32,
    /// Stamp records with the decode time instead of the payload timestamp.
    pub use_now_timestamp: bool,
    /// Allow-list of fields retained by the logpush codec; empty keeps all.
    pub message_fields: Vec<String>,
    /// Ordered fields used to build the logpush message summary.
    pub message_summary_fields: Vec<String>,
    /// Error on absent summary fields instead of omitting them.
    pub require_summary_fields: bool,
    /// Object-store endpoint override for S3-compatible stores.
    pub s3_endpoint: Option<String>,
    pub aws_region: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            graylog_host: "localhost".to_string(),
            graylog_port: 12201,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
            tcp_no_delay: true,
            queue_size: DEFAULT_TCP_QUEUE_SIZE,
            max_in_flight_sends: DEFAULT_TCP_MAX_IN_FLIGHT_SENDS,
            content_type: ContentType::TextPlain,
            compression_type: CompressionType::None,
            protocol_type: ProtocolType::Tcp,
            shutdown_flush_timeout_ms: DEFAULT_SHUTDOWN_FLUSH_TIMEOUT_MS,
            shutdown_flush_retries: DEFAULT_SHUTDOWN_FLUSH_RETRIES,
            use_now_timestamp: false,
            message_fields: Vec::new(),
            message_summary_fields: split_fields(DEFAULT_MESSAGE_SUMMARY_FIELDS),
            require_summary_fields: false,
            s3_endpoint: None,
            aws_region: DEFAULT_AWS_REGION.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Creates the configuration from environment variables and validates it.
    pub fn from_env() -> Result<Self, ConfigError> {
        let graylog_host =
            env::var(GRAYLOG_HOST).map_err(|_| ConfigError::MissingVariable(GRAYLOG_HOST))?;
        let graylog_port = required_parsed::<u16>(GRAYLOG_PORT)?;

        let content_type_value =
            env::var(CONTENT_TYPE).map_err(|_| ConfigError::MissingVariable(CONTENT_TYPE))?;
        let content_type = ContentType::from_type(&content_type_value)?;

        let compression_type = env::var(COMPRESSION_TYPE)
            .map(|value| CompressionType::from_type(&value))
            .unwrap_or_default();
        let protocol_type = env::var(PROTOCOL_TYPE)
            .map(|value| ProtocolType::from_type(&value))
            .unwrap_or_default();

        let message_fields = env::var(LOGPUSH_MESSAGE_FIELDS)
            .map(|value| split_fields(&value))
            .unwrap_or_default();
        let message_summary_fields = env::var(LOGPUSH_MESSAGE_SUMMARY_FIELDS)
            .map(|value| split_fields(&value))
            .unwrap_or_else(|_| split_fields(DEFAULT_MESSAGE_SUMMARY_FIELDS));

        let config = Config {
            graylog_host,
            graylog_port,
            connect_timeout_ms: env_parsed(CONNECT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT_MS),
            reconnect_delay_ms: env_parsed(RECONNECT_DELAY, DEFAULT_RECONNECT_DELAY_MS),
            tcp_no_delay: env_flag(TCP_NO_DELAY, true),
            queue_size: env_parsed(TCP_QUEUE_SIZE, DEFAULT_TCP_QUEUE_SIZE),
            max_in_flight_sends: env_parsed(
                TCP_MAX_IN_FLIGHT_SENDS,
                DEFAULT_TCP_MAX_IN_FLIGHT_SENDS,
            ),
            content_type,
            compression_type,
            protocol_type,
            shutdown_flush_timeout_ms: env_parsed(
                SHUTDOWN_FLUSH_TIMEOUT_MS,
                DEFAULT_SHUTDOWN_FLUSH_TIMEOUT_MS,
            ),
            shutdown_flush_retries: env_parsed(
                SHUTDOWN_FLUSH_RETRIES,
                DEFAULT_SHUTDOWN_FLUSH_RETRIES,
            ),
            use_now_timestamp: env_flag(LOGPUSH_USE_NOW_TIMESTAMP, false),
            message_fields,
            message_summary_fields,
            require_summary_fields: env_flag(LOGPUSH_REQUIRE_SUMMARY_FIELDS, false),
            s3_endpoint: env::var(S3_ENDPOINT).ok(),
            aws_region: env::var(AWS_REGION).unwrap_or_else(|_| DEFAULT_AWS_REGION.to_string()),
            log_level: env::var(LOG_LEVEL)
                .map(|value| value.to_lowercase())
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.graylog_host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: GRAYLOG_HOST,
                value: self.graylog_host.clone(),
            });
        }

        if self.graylog_port == 0 {
            return Err(ConfigError::InvalidValue {
                name: GRAYLOG_PORT,
                value: self.graylog_port.to_string(),
            });
        }

        if self.queue_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: TCP_QUEUE_SIZE,
                value: self.queue_size.to_string(),
            });
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                name: LOG_LEVEL,
                value: self.log_level.clone(),
            });
        }

        Ok(())
    }
}

fn required_parsed<T: FromStr>(name: &'static str) -> Result<T, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::MissingVariable(name))?;
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.clone(),
    })
}

fn env_parsed<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|value| {
            if default {
                value.to_lowercase() != "false"
            } else {
                value.to_lowercase() == "true"
            }
        })
        .unwrap_or(default)
}

fn split_fields(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(String::from)
        .collect()
}
