// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use crate::error::ConfigError;

/// Input format of the log files landing in the bucket.
///
/// The set is closed: adding a format means adding a variant here and a
/// decode arm to [`crate::codec::Codec`], never touching the callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    TextPlain,
    ApplicationJson,
    CloudflareLogpush,
}

impl ContentType {
    /// Parses the configured content type string.
    ///
    /// Unknown values are a configuration error and abort startup; they are
    /// never mapped to a default.
    pub fn from_type(value: &str) -> Result<Self, ConfigError> {
        match value.trim() {
            "text/plain" => Ok(ContentType::TextPlain),
            "application/json" => Ok(ContentType::ApplicationJson),
            "cloudflare/logpush" => Ok(ContentType::CloudflareLogpush),
            other => Err(ConfigError::UnsupportedContentType(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::TextPlain => "text/plain",
            ContentType::ApplicationJson => "application/json",
            ContentType::CloudflareLogpush => "cloudflare/logpush",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
