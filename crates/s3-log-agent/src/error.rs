// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors raised while loading or validating the configuration.
///
/// All of these are fatal at startup; none occur during line processing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    MissingVariable(&'static str),

    #[error("invalid value [{value}] for {name}")]
    InvalidValue { name: &'static str, value: String },

    #[error("the content type [{0}] is not supported")]
    UnsupportedContentType(String),
}

/// Errors raised while decoding a single line.
///
/// Both variants are recovered locally: the line is skipped and the object
/// continues.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("required summary field [{0}] is absent")]
    MissingRequiredField(String),
}
