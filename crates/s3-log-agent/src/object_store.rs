// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

/// Errors returned by an object store client.
#[derive(Debug, thiserror::Error)]
pub enum ObjectStoreError {
    #[error("failed to fetch object [{key}] from bucket [{bucket}]: {detail}")]
    RequestFailed {
        bucket: String,
        key: String,
        detail: String,
    },

    #[error("unexpected status [{status}] fetching object [{key}] from bucket [{bucket}]")]
    UnexpectedStatus {
        bucket: String,
        key: String,
        status: u16,
    },
}

/// Read access to the object store the log files land in.
///
/// The store is an external collaborator; implementations own credentials,
/// endpoints, and retries. The pipeline only ever downloads whole objects.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError>;
}
