// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::transport::RecordTransport;

/// Stops the transport and waits for its queue to drain.
///
/// Polls at most `retries` times, sleeping `timeout_ms` between polls, which
/// bounds the wait to `timeout_ms * retries`. Exhausting the budget is not an
/// error; it is logged and the caller moves on to the next object.
///
/// Returns whether the queue drained.
pub async fn flush_and_wait(
    transport: &dyn RecordTransport,
    timeout_ms: u64,
    retries: u32,
) -> bool {
    transport.stop_accepting();

    for _ in 0..retries {
        if transport.pending() == 0 {
            return true;
        }
        sleep(Duration::from_millis(timeout_ms)).await;
    }

    let remaining = transport.pending();
    if remaining == 0 {
        return true;
    }
    warn!(
        "Flush wait budget of [{timeout_ms}ms] x [{retries}] exhausted with [{remaining}] \
         messages still queued."
    );
    false
}
