// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Core pipeline for forwarding S3-landed log files to a GELF collector.
//!
//! Each arriving object reference is fetched, run through the compression
//! filter, decoded line by line with the configured codec, and handed to the
//! transport. Objects are processed strictly sequentially; failures never
//! cross object boundaries.

pub mod codec;
pub mod compression;
pub mod config;
pub mod content_type;
pub mod error;
pub mod event;
pub mod object_store;
pub mod processor;
pub mod protocol;
pub mod scanner;
pub mod shutdown;
pub mod transport;
