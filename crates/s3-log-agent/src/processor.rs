// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::io::BufRead;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::codec::Codec;
use crate::config::Config;
use crate::event::{S3EventNotification, S3EventRecord};
use crate::object_store::ObjectStore;
use crate::scanner::object_reader;
use crate::shutdown::flush_and_wait;
use crate::transport::{RecordTransport, TransportFactory};

const PROGRESS_LOG_INTERVAL: u64 = 100;

/// Per-object result of a streaming run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessingOutcome {
    /// Lines decoded and handed to the transport.
    pub sent: u64,
    /// Blank lines and lines that failed to decode.
    pub skipped: u64,
}

/// Streams one object's text line by line into the transport.
pub struct RecordStreamer {
    codec: Codec,
}

impl RecordStreamer {
    pub fn new(config: Arc<Config>) -> Self {
        RecordStreamer {
            codec: Codec::new(config),
        }
    }

    /// Decodes and forwards every line of the object.
    ///
    /// Blank lines are skipped. A line that fails to decode is logged and
    /// skipped; the object continues. A send failure abandons the remainder
    /// of the object: transport errors indicate a connection-level problem
    /// that retrying line by line will not fix.
    pub async fn process_object(
        &self,
        object_key: &str,
        reader: impl BufRead,
        transport: &dyn RecordTransport,
    ) -> ProcessingOutcome {
        let mut outcome = ProcessingOutcome::default();

        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    error!("Failed reading from object [{object_key}]: {e}. Skipping the rest of the file.");
                    break;
                }
            };

            if line.trim().is_empty() {
                warn!("Line is empty. Skipping.");
                outcome.skipped += 1;
                continue;
            }

            let message = match self.codec.decode(&line) {
                Ok(message) => message,
                Err(e) => {
                    error!("Failed to decode message [{line}]: {e}");
                    outcome.skipped += 1;
                    continue;
                }
            };

            if let Err(e) = transport.send(message).await {
                error!("Failed to send message [{line}]: {e}. Abandoning object [{object_key}].");
                break;
            }

            outcome.sent += 1;
            if outcome.sent % PROGRESS_LOG_INTERVAL == 0 {
                debug!("Sent [{}] messages.", outcome.sent);
            }
        }

        debug!(
            "Finished sending [{}] messages from object [{object_key}].",
            outcome.sent
        );
        outcome
    }
}

/// Drives one invocation: every object referenced by the event, in order.
pub struct S3EventProcessor {
    config: Arc<Config>,
    object_store: Arc<dyn ObjectStore>,
    transport_factory: Arc<dyn TransportFactory>,
    streamer: RecordStreamer,
}

impl S3EventProcessor {
    pub fn new(
        config: Arc<Config>,
        object_store: Arc<dyn ObjectStore>,
        transport_factory: Arc<dyn TransportFactory>,
    ) -> Self {
        let streamer = RecordStreamer::new(Arc::clone(&config));
        S3EventProcessor {
            config,
            object_store,
            transport_factory,
            streamer,
        }
    }

    /// Processes every record carried by the notification, strictly
    /// sequentially. Failures are contained per object: a bad file never
    /// blocks delivery of the others.
    ///
    /// Returns the number of records processed.
    pub async fn process_event(&self, event: &S3EventNotification) -> usize {
        for record in &event.records {
            self.process_record(record).await;
        }
        info!("Processed [{}] S3 records.", event.records.len());
        event.records.len()
    }

    async fn process_record(&self, record: &S3EventRecord) {
        let bucket = &record.s3.bucket.name;
        let key = &record.s3.object.key;
        info!("Reading object [{key}] from bucket [{bucket}]");

        let bytes = match self.object_store.fetch(bucket, key).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to read object [{key}] from bucket [{bucket}]: {e}. Skipping file.");
                return;
            }
        };

        let transport = self.transport_factory.create();
        let reader = object_reader(bytes, self.config.compression_type);
        let outcome = self
            .streamer
            .process_object(key, reader, transport.as_ref())
            .await;
        info!(
            "Sent [{}] messages and skipped [{}] lines for object [{key}].",
            outcome.sent, outcome.skipped
        );

        // Wait for queued messages to go out before moving to the next
        // object.
        debug!(
            "Waiting up to [{}ms] with [{}] retries for the transport to drain.",
            self.config.shutdown_flush_timeout_ms, self.config.shutdown_flush_retries
        );
        let drained = flush_and_wait(
            transport.as_ref(),
            self.config.shutdown_flush_timeout_ms,
            self.config.shutdown_flush_retries,
        )
        .await;
        if drained {
            debug!("Transport shutdown complete.");
        }
    }
}
