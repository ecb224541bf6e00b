// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use tracing::warn;

/// Compression envelope of the objects landing in the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionType {
    Gzip,
    #[default]
    None,
}

impl CompressionType {
    /// Parses the configured compression type, defaulting to no compression
    /// with a warning for unknown values.
    pub fn from_type(value: &str) -> Self {
        match value.trim() {
            "gzip" => CompressionType::Gzip,
            "none" => CompressionType::None,
            other => {
                warn!(
                    "Compression type [{other}] not found. Defaulting to [{}].",
                    CompressionType::None
                );
                CompressionType::None
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompressionType::Gzip => "gzip",
            CompressionType::None => "none",
        }
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types_parse() {
        assert_eq!(CompressionType::from_type("gzip"), CompressionType::Gzip);
        assert_eq!(CompressionType::from_type("none"), CompressionType::None);
    }

    #[test]
    fn test_unknown_type_defaults_to_none() {
        assert_eq!(CompressionType::from_type("snappy"), CompressionType::None);
    }
}
