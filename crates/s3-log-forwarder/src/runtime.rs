// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use anyhow::anyhow;
use tokio::time::sleep;
use tracing::{debug, error};

use s3_log_agent::event::S3EventNotification;
use s3_log_agent::processor::S3EventProcessor;

const RUNTIME_API_VERSION: &str = "2018-06-01";
const REQUEST_ID_HEADER: &str = "Lambda-Runtime-Aws-Request-Id";

/// Delay before retrying after a failed next-invocation poll, to avoid a hot
/// loop while the runtime endpoint is unreachable.
const POLL_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Client for the Lambda custom runtime API.
///
/// The run loop long-polls the next-invocation endpoint, hands each S3 event
/// to the processor, and reports the outcome back to the runtime.
pub struct RuntimeClient {
    client: reqwest::Client,
    base_url: String,
}

impl RuntimeClient {
    pub fn new(runtime_api: &str) -> Self {
        RuntimeClient {
            client: reqwest::Client::new(),
            base_url: format!("http://{runtime_api}/{RUNTIME_API_VERSION}/runtime"),
        }
    }

    pub async fn run(&self, processor: &S3EventProcessor) {
        debug!("Entering the invocation loop against [{}]", self.base_url);
        loop {
            let invocation = match self.next_invocation().await {
                Ok(invocation) => invocation,
                Err(e) => {
                    error!("Failed to fetch the next invocation: {e}");
                    sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };
            self.handle_invocation(processor, invocation).await;
        }
    }

    async fn handle_invocation(&self, processor: &S3EventProcessor, invocation: Invocation) {
        let Invocation {
            request_id,
            payload,
        } = invocation;

        match serde_json::from_slice::<S3EventNotification>(&payload) {
            Ok(event) => {
                let processed = processor.process_event(&event).await;
                let body = format!("Processed {processed} S3 records.");
                if let Err(e) = self.post_response(&request_id, &body).await {
                    error!("Failed to post the invocation response: {e}");
                }
            }
            Err(e) => {
                error!("Failed to parse the S3 event payload: {e}");
                let message = format!("Failed to parse the S3 event payload: {e}");
                if let Err(e) = self.post_error(&request_id, &message).await {
                    error!("Failed to post the invocation error: {e}");
                }
            }
        }
    }

    async fn next_invocation(&self) -> anyhow::Result<Invocation> {
        let response = self
            .client
            .get(format!("{}/invocation/next", self.base_url))
            .send()
            .await?;
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("invocation is missing the request id header"))?;
        let payload = response.bytes().await?.to_vec();
        Ok(Invocation {
            request_id,
            payload,
        })
    }

    async fn post_response(&self, request_id: &str, body: &str) -> anyhow::Result<()> {
        self.client
            .post(format!(
                "{}/invocation/{request_id}/response",
                self.base_url
            ))
            .body(body.to_string())
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn post_error(&self, request_id: &str, message: &str) -> anyhow::Result<()> {
        let payload = serde_json::json!({
            "errorMessage": message,
            "errorType": "InvalidEventError",
        });
        self.client
            .post(format!("{}/invocation/{request_id}/error", self.base_url))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

struct Invocation {
    request_id: String,
    payload: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use s3_log_agent::config::Config;
    use s3_log_agent::transport::GelfTransportFactory;

    use crate::object_store::HttpObjectStore;

    use super::*;

    fn idle_processor() -> S3EventProcessor {
        let config = Arc::new(Config::default());
        S3EventProcessor::new(
            Arc::clone(&config),
            Arc::new(HttpObjectStore::new(&config)),
            Arc::new(GelfTransportFactory::new(config)),
        )
    }

    #[tokio::test]
    async fn test_next_invocation_reads_request_id_and_payload() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/2018-06-01/runtime/invocation/next")
            .with_status(200)
            .with_header(REQUEST_ID_HEADER, "req-1")
            .with_body(r#"{"Records":[]}"#)
            .create_async()
            .await;

        let client = RuntimeClient::new(&server.host_with_port());
        let invocation = client.next_invocation().await.unwrap();
        assert_eq!(invocation.request_id, "req-1");
        assert_eq!(invocation.payload, br#"{"Records":[]}"#);
    }

    #[tokio::test]
    async fn test_missing_request_id_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/2018-06-01/runtime/invocation/next")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = RuntimeClient::new(&server.host_with_port());
        assert!(client.next_invocation().await.is_err());
    }

    #[tokio::test]
    async fn test_empty_event_posts_processed_count() {
        let mut server = mockito::Server::new_async().await;
        let response_mock = server
            .mock("POST", "/2018-06-01/runtime/invocation/req-2/response")
            .match_body("Processed 0 S3 records.")
            .with_status(202)
            .create_async()
            .await;

        let client = RuntimeClient::new(&server.host_with_port());
        client
            .handle_invocation(
                &idle_processor(),
                Invocation {
                    request_id: "req-2".to_string(),
                    payload: b"{}".to_vec(),
                },
            )
            .await;

        response_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unparseable_event_posts_invocation_error() {
        let mut server = mockito::Server::new_async().await;
        let error_mock = server
            .mock("POST", "/2018-06-01/runtime/invocation/req-3/error")
            .with_status(202)
            .create_async()
            .await;

        let client = RuntimeClient::new(&server.host_with_port());
        client
            .handle_invocation(
                &idle_processor(),
                Invocation {
                    request_id: "req-3".to_string(),
                    payload: b"not an event".to_vec(),
                },
            )
            .await;

        error_mock.assert_async().await;
    }
}
