// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use gelf_transport::GelfProtocol;
use tracing::warn;

/// Wire protocol used to reach the GELF collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolType {
    #[default]
    Tcp,
    Udp,
}

impl ProtocolType {
    /// Parses the configured protocol type, defaulting to TCP with a warning
    /// for unknown values.
    pub fn from_type(value: &str) -> Self {
        match value.trim() {
            "tcp" => ProtocolType::Tcp,
            "udp" => ProtocolType::Udp,
            other => {
                warn!(
                    "Protocol type [{other}] not found. Defaulting to [{}].",
                    ProtocolType::Tcp
                );
                ProtocolType::Tcp
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProtocolType::Tcp => "tcp",
            ProtocolType::Udp => "udp",
        }
    }

    pub fn gelf_protocol(self) -> GelfProtocol {
        match self {
            ProtocolType::Tcp => GelfProtocol::Tcp,
            ProtocolType::Udp => GelfProtocol::Udp,
        }
    }
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
