// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! End-to-end run of the pipeline: gzipped logpush object in, GELF frames
//! out over a real TCP connection.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::time::{timeout, Duration};

use s3_log_agent::compression::CompressionType;
use s3_log_agent::config::Config;
use s3_log_agent::content_type::ContentType;
use s3_log_agent::event::S3EventNotification;
use s3_log_agent::object_store::{ObjectStore, ObjectStoreError};
use s3_log_agent::processor::S3EventProcessor;
use s3_log_agent::transport::GelfTransportFactory;

struct StaticObjectStore {
    payload: Vec<u8>,
}

#[async_trait]
impl ObjectStore for StaticObjectStore {
    async fn fetch(&self, _bucket: &str, _key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        Ok(self.payload.clone())
    }
}

fn gzip(lines: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(lines.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

#[tokio::test]
async fn gzipped_logpush_object_reaches_the_collector() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let collector = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut chunk = [0u8; 4096];
        while received.iter().filter(|&&b| b == 0).count() < 2 {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&chunk[..n]);
        }
        received
    });

    let lines = concat!(
        r#"{"ClientRequestHost":"a.com","EdgeResponseStatus":503,"EdgeStartTimestamp":1568923202,"FirewallMatchesActions":["allow"]}"#,
        "\n",
        "\n",
        r#"{"ClientRequestHost":"b.com","EdgeResponseStatus":204,"EdgeStartTimestamp":"2019-09-19T19:20:02Z"}"#,
        "\n",
    );

    let config = Arc::new(Config {
        graylog_host: "127.0.0.1".to_string(),
        graylog_port: port,
        content_type: ContentType::CloudflareLogpush,
        compression_type: CompressionType::Gzip,
        connect_timeout_ms: 1_000,
        reconnect_delay_ms: 100,
        queue_size: 16,
        shutdown_flush_timeout_ms: 10,
        shutdown_flush_retries: 500,
        ..Default::default()
    });

    let processor = S3EventProcessor::new(
        Arc::clone(&config),
        Arc::new(StaticObjectStore {
            payload: gzip(lines),
        }),
        Arc::new(GelfTransportFactory::new(Arc::clone(&config))),
    );

    let event: S3EventNotification = serde_json::from_str(
        r#"{"Records":[{"s3":{"bucket":{"name":"logs"},"object":{"key":"cf/today.log.gz"}}}]}"#,
    )
    .unwrap();
    let processed = processor.process_event(&event).await;
    assert_eq!(processed, 1);

    let received = timeout(Duration::from_secs(10), collector)
        .await
        .unwrap()
        .unwrap();
    let frames: Vec<&[u8]> = received
        .split(|&b| b == 0)
        .filter(|frame| !frame.is_empty())
        .collect();
    assert_eq!(frames.len(), 2);

    let first: Value = serde_json::from_slice(frames[0]).unwrap();
    assert_eq!(first["version"], "1.1");
    assert_eq!(first["short_message"], "ClientRequestHost: a.com");
    assert_eq!(first["timestamp"].as_f64().unwrap(), 1_568_923_202.0);
    assert_eq!(first["_EdgeResponseStatus"], 503);
    assert_eq!(first["_EdgeResponseStatusClass"], "5xx");
    assert!(first.get("_FirewallMatchesActions").is_none());

    let second: Value = serde_json::from_slice(frames[1]).unwrap();
    assert_eq!(second["short_message"], "ClientRequestHost: b.com");
    assert_eq!(second["timestamp"].as_f64().unwrap(), 1_568_920_802.0);
    assert_eq!(second["_EdgeResponseStatusClass"], "2xx");
}
