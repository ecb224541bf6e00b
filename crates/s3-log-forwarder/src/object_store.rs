// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use tracing::debug;

use s3_log_agent::config::Config;
use s3_log_agent::object_store::{ObjectStore, ObjectStoreError};

/// Fetches objects over plain HTTP using path-style addressing.
///
/// Works against S3-compatible stores and buckets the execution role can
/// read without request signing. The endpoint can be overridden through the
/// configuration for MinIO/LocalStack style deployments.
pub struct HttpObjectStore {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpObjectStore {
    pub fn new(config: &Config) -> Self {
        let endpoint = config
            .s3_endpoint
            .clone()
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", config.aws_region));
        HttpObjectStore {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{bucket}/{key}", self.endpoint)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let url = self.object_url(bucket, key);
        debug!("Attempting to read object [{key}] from [{url}].");

        let response = self.client.get(&url).send().await.map_err(|e| {
            ObjectStoreError::RequestFailed {
                bucket: bucket.to_string(),
                key: key.to_string(),
                detail: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ObjectStoreError::UnexpectedStatus {
                bucket: bucket.to_string(),
                key: key.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ObjectStoreError::RequestFailed {
                bucket: bucket.to_string(),
                key: key.to_string(),
                detail: e.to_string(),
            })?;
        debug!("Object read successfully ([{}] bytes).", bytes.len());
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_uses_path_style_addressing() {
        let config = Config {
            s3_endpoint: Some("http://localhost:9000/".to_string()),
            ..Default::default()
        };
        let store = HttpObjectStore::new(&config);
        assert_eq!(
            store.object_url("logs", "cf/today.log.gz"),
            "http://localhost:9000/logs/cf/today.log.gz"
        );
    }

    #[test]
    fn test_default_endpoint_is_regional() {
        let config = Config {
            aws_region: "eu-west-1".to_string(),
            ..Default::default()
        };
        let store = HttpObjectStore::new(&config);
        assert_eq!(
            store.object_url("logs", "key"),
            "https://s3.eu-west-1.amazonaws.com/logs/key"
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_body_on_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/logs/cf/today.log")
            .with_status(200)
            .with_body("line one\n")
            .create_async()
            .await;

        let config = Config {
            s3_endpoint: Some(server.url()),
            ..Default::default()
        };
        let store = HttpObjectStore::new(&config);

        let bytes = store.fetch("logs", "cf/today.log").await.unwrap();
        assert_eq!(bytes, b"line one\n");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_surfaces_unexpected_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/logs/missing.log")
            .with_status(404)
            .create_async()
            .await;

        let config = Config {
            s3_endpoint: Some(server.url()),
            ..Default::default()
        };
        let store = HttpObjectStore::new(&config);

        let result = store.fetch("logs", "missing.log").await;
        assert!(matches!(
            result,
            Err(ObjectStoreError::UnexpectedStatus { status: 404, .. })
        ));
    }
}
