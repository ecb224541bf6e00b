// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors surfaced to callers of the transport.
///
/// Connection-level failures are not reported here; the writer task owns the
/// socket and retries them internally.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("send queue is saturated")]
    QueueFull,

    #[error("transport is no longer accepting messages")]
    Closed,
}
