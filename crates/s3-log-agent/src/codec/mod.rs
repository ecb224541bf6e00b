// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Per-format codecs turning one line of text into a GELF message.
//!
//! Codecs are pure: no I/O, no shared state. The variant set is closed over
//! the supported content types; dispatch happens once per line through
//! [`Codec::decode`].

pub mod application_json;
pub mod cloudflare_logpush;
pub mod plain_text;

use std::sync::Arc;
use std::time::UNIX_EPOCH;

use gelf_transport::GelfMessage;
use tracing::trace;

use crate::config::Config;
use crate::content_type::ContentType;
use crate::error::CodecError;

use application_json::ApplicationJsonCodec;
use cloudflare_logpush::CloudflareLogpushCodec;
use plain_text::PlainTextCodec;

/// The codec selected for the configured content type.
pub enum Codec {
    PlainText(PlainTextCodec),
    ApplicationJson(ApplicationJsonCodec),
    CloudflareLogpush(CloudflareLogpushCodec),
}

impl Codec {
    /// Selects the codec for the configured content type.
    ///
    /// Total over [`ContentType`]; unsupported values were already rejected
    /// when the configuration was loaded.
    pub fn new(config: Arc<Config>) -> Self {
        match config.content_type {
            ContentType::TextPlain => Codec::PlainText(PlainTextCodec),
            ContentType::ApplicationJson => Codec::ApplicationJson(ApplicationJsonCodec),
            ContentType::CloudflareLogpush => {
                Codec::CloudflareLogpush(CloudflareLogpushCodec::new(config))
            }
        }
    }

    /// Decodes one line into a GELF message.
    pub fn decode(&self, line: &str) -> Result<GelfMessage, CodecError> {
        let message = match self {
            Codec::PlainText(codec) => Ok(codec.decode(line)),
            Codec::ApplicationJson(codec) => codec.decode(line),
            Codec::CloudflareLogpush(codec) => codec.decode(line),
        }?;

        trace!(
            "Message contains [{}] fields.",
            message.additional_fields().len()
        );
        Ok(message)
    }
}

/// Current time in fractional epoch seconds.
pub(crate) fn now_epoch_seconds() -> f64 {
    UNIX_EPOCH
        .elapsed()
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selects_codec_for_content_type() {
        let config = Arc::new(Config {
            content_type: ContentType::ApplicationJson,
            ..Default::default()
        });
        assert!(matches!(Codec::new(config), Codec::ApplicationJson(_)));

        let config = Arc::new(Config {
            content_type: ContentType::CloudflareLogpush,
            ..Default::default()
        });
        assert!(matches!(Codec::new(config), Codec::CloudflareLogpush(_)));

        let config = Arc::new(Config::default());
        assert!(matches!(Codec::new(config), Codec::PlainText(_)));
    }

    #[test]
    fn test_now_epoch_seconds_is_recent() {
        let now = now_epoch_seconds();
        // 2020-01-01 as a floor; anything earlier means a broken clock read.
        assert!(now > 1_577_836_800.0);
    }
}
