// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::io::{BufRead, BufReader, Cursor};

use flate2::read::GzDecoder;

use crate::compression::CompressionType;

/// Wraps fetched object bytes in a line-oriented reader, applying the
/// configured compression filter.
///
/// Corrupt gzip data surfaces as an I/O error on the first read and aborts
/// only the object being processed.
pub fn object_reader(bytes: Vec<u8>, compression: CompressionType) -> Box<dyn BufRead + Send> {
    match compression {
        CompressionType::Gzip => Box::new(BufReader::new(GzDecoder::new(Cursor::new(bytes)))),
        CompressionType::None => Box::new(BufReader::new(Cursor::new(bytes))),
    }
}
