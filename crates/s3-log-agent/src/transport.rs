// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gelf_transport::{GelfMessage, GelfTransport, GelfTransportConfig, TransportError};

use crate::config::Config;

/// Outbound transport seam for the pipeline.
///
/// `send` fails synchronously when the queue is saturated or the transport
/// has stopped; `pending` and `stop_accepting` exist for the shutdown flush
/// wait.
#[async_trait]
pub trait RecordTransport: Send + Sync {
    async fn send(&self, message: GelfMessage) -> Result<(), TransportError>;

    /// Messages accepted but not yet written out.
    fn pending(&self) -> usize;

    /// Stops accepting new messages while the queue drains.
    fn stop_accepting(&self);
}

#[async_trait]
impl RecordTransport for GelfTransport {
    async fn send(&self, message: GelfMessage) -> Result<(), TransportError> {
        GelfTransport::send(self, message).await
    }

    fn pending(&self) -> usize {
        GelfTransport::pending(self)
    }

    fn stop_accepting(&self) {
        GelfTransport::stop_accepting(self)
    }
}

/// Builds one transport per processed object.
pub trait TransportFactory: Send + Sync {
    fn create(&self) -> Box<dyn RecordTransport>;
}

/// Factory producing GELF transports configured from the process
/// configuration.
pub struct GelfTransportFactory {
    config: Arc<Config>,
}

impl GelfTransportFactory {
    pub fn new(config: Arc<Config>) -> Self {
        GelfTransportFactory { config }
    }
}

impl TransportFactory for GelfTransportFactory {
    fn create(&self) -> Box<dyn RecordTransport> {
        let config = &self.config;
        Box::new(GelfTransport::start(GelfTransportConfig {
            host: config.graylog_host.clone(),
            port: config.graylog_port,
            protocol: config.protocol_type.gelf_protocol(),
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            reconnect_delay: Duration::from_millis(config.reconnect_delay_ms),
            tcp_no_delay: config.tcp_no_delay,
            queue_size: config.queue_size,
            max_in_flight_sends: config.max_in_flight_sends,
        }))
    }
}
