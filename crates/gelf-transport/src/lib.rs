// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! A small GELF client library.
//!
//! Messages are queued on a bounded channel and written to the collector by a
//! background task, so `send` never blocks on the network. The transport
//! exposes the number of messages still in flight, which lets callers wait
//! for a drain before shutting down.

pub mod error;
pub mod message;
pub mod transport;

pub use error::TransportError;
pub use message::GelfMessage;
pub use transport::{GelfProtocol, GelfTransport, GelfTransportConfig};
