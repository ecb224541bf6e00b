// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use gelf_transport::GelfMessage;

use crate::codec::now_epoch_seconds;

/// Passes the line through verbatim as the message summary.
pub struct PlainTextCodec;

impl PlainTextCodec {
    pub fn decode(&self, line: &str) -> GelfMessage {
        let mut message = GelfMessage::new(line);
        message.set_timestamp(now_epoch_seconds());
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_becomes_summary() {
        let message = PlainTextCodec.decode("Sep 13 20:23:09 host sshd[42]: session opened");
        assert_eq!(
            message.short_message(),
            "Sep 13 20:23:09 host sshd[42]: session opened"
        );
        assert!(message.additional_fields().is_empty());
        assert!(message.timestamp().is_some());
    }
}
