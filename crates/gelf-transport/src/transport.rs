// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::net::{TcpStream, UdpSocket};
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, warn};

use crate::error::TransportError;
use crate::message::GelfMessage;

/// Largest UDP payload the transport will emit. Messages beyond this are
/// dropped; chunked GELF encoding is not implemented.
const MAX_UDP_PAYLOAD: usize = 65_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GelfProtocol {
    Tcp,
    Udp,
}

#[derive(Debug, Clone)]
pub struct GelfTransportConfig {
    pub host: String,
    pub port: u16,
    pub protocol: GelfProtocol,
    pub connect_timeout: Duration,
    pub reconnect_delay: Duration,
    pub tcp_no_delay: bool,
    /// Depth of the send queue. `send` fails once the queue stays full past
    /// the connect timeout.
    pub queue_size: usize,
    /// Number of frames written between explicit socket flushes. The writer
    /// also flushes whenever the queue runs dry.
    pub max_in_flight_sends: usize,
}

impl Default for GelfTransportConfig {
    fn default() -> Self {
        GelfTransportConfig {
            host: "localhost".to_string(),
            port: 12201,
            protocol: GelfProtocol::Tcp,
            connect_timeout: Duration::from_millis(10_000),
            reconnect_delay: Duration::from_millis(10_000),
            tcp_no_delay: true,
            queue_size: 512,
            max_in_flight_sends: 512,
        }
    }
}

/// Queued GELF transport.
///
/// `start` spawns a writer task that owns the socket. Messages are handed to
/// it over a bounded channel; the pending counter tracks every accepted
/// message until its frame has been written and flushed, so a caller can
/// poll `pending()` to observe a drain.
pub struct GelfTransport {
    tx: mpsc::Sender<GelfMessage>,
    pending: Arc<AtomicUsize>,
    accepting: AtomicBool,
    send_timeout: Duration,
}

impl GelfTransport {
    pub fn start(config: GelfTransportConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.queue_size);
        let pending = Arc::new(AtomicUsize::new(0));
        let send_timeout = config.connect_timeout;

        let writer_pending = Arc::clone(&pending);
        match config.protocol {
            GelfProtocol::Tcp => {
                tokio::spawn(run_tcp_writer(config, rx, writer_pending));
            }
            GelfProtocol::Udp => {
                tokio::spawn(run_udp_writer(config, rx, writer_pending));
            }
        }

        GelfTransport {
            tx,
            pending,
            accepting: AtomicBool::new(true),
            send_timeout,
        }
    }

    /// Enqueues a message for delivery.
    ///
    /// Fails with `QueueFull` when the queue stays saturated past the
    /// configured timeout and with `Closed` after `stop_accepting` or once
    /// the writer task has terminated.
    pub async fn send(&self, message: GelfMessage) -> Result<(), TransportError> {
        if !self.accepting.load(Ordering::Acquire) {
            return Err(TransportError::Closed);
        }

        self.pending.fetch_add(1, Ordering::AcqRel);
        match self.tx.send_timeout(message, self.send_timeout).await {
            Ok(()) => Ok(()),
            Err(mpsc::error::SendTimeoutError::Timeout(_)) => {
                self.pending.fetch_sub(1, Ordering::AcqRel);
                Err(TransportError::QueueFull)
            }
            Err(mpsc::error::SendTimeoutError::Closed(_)) => {
                self.pending.fetch_sub(1, Ordering::AcqRel);
                Err(TransportError::Closed)
            }
        }
    }

    /// Number of messages accepted but not yet written to the socket.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Makes all subsequent sends fail while the writer drains the queue.
    pub fn stop_accepting(&self) {
        self.accepting.store(false, Ordering::Release);
    }
}

async fn connect_tcp(config: &GelfTransportConfig, addr: &str) -> BufWriter<TcpStream> {
    loop {
        match timeout(config.connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                if let Err(e) = stream.set_nodelay(config.tcp_no_delay) {
                    warn!("Failed to set TCP_NODELAY on connection to [{addr}]: {e}");
                }
                debug!("Connected to GELF collector at [{addr}]");
                return BufWriter::new(stream);
            }
            Ok(Err(e)) => {
                error!("Failed to connect to GELF collector at [{addr}]: {e}");
            }
            Err(_) => {
                error!(
                    "Timed out after [{}ms] connecting to GELF collector at [{addr}]",
                    config.connect_timeout.as_millis()
                );
            }
        }
        sleep(config.reconnect_delay).await;
    }
}

async fn run_tcp_writer(
    config: GelfTransportConfig,
    mut rx: mpsc::Receiver<GelfMessage>,
    pending: Arc<AtomicUsize>,
) {
    let addr = format!("{}:{}", config.host, config.port);
    let mut writer: Option<BufWriter<TcpStream>> = None;
    let mut since_flush = 0usize;

    while let Some(message) = rx.recv().await {
        // Null-framed GELF over TCP.
        let mut frame = message.to_wire_json().into_bytes();
        frame.push(0);

        loop {
            if writer.is_none() {
                writer = Some(connect_tcp(&config, &addr).await);
                since_flush = 0;
            }
            let Some(stream) = writer.as_mut() else {
                continue;
            };

            if let Err(e) = stream.write_all(&frame).await {
                error!("Failed to write GELF frame to [{addr}]: {e}");
                writer = None;
                sleep(config.reconnect_delay).await;
                continue;
            }

            since_flush += 1;
            if rx.is_empty() || since_flush >= config.max_in_flight_sends {
                if let Err(e) = stream.flush().await {
                    error!("Failed to flush GELF frames to [{addr}]: {e}");
                    writer = None;
                    sleep(config.reconnect_delay).await;
                    continue;
                }
                since_flush = 0;
            }

            pending.fetch_sub(1, Ordering::AcqRel);
            break;
        }
    }

    if let Some(mut stream) = writer {
        let _ = stream.flush().await;
    }
    debug!("GELF writer for [{addr}] stopped");
}

async fn run_udp_writer(
    config: GelfTransportConfig,
    mut rx: mpsc::Receiver<GelfMessage>,
    pending: Arc<AtomicUsize>,
) {
    let addr = format!("{}:{}", config.host, config.port);
    let socket = loop {
        match UdpSocket::bind("0.0.0.0:0").await {
            Ok(socket) => match socket.connect(&addr).await {
                Ok(()) => break socket,
                Err(e) => error!("Failed to resolve GELF collector address [{addr}]: {e}"),
            },
            Err(e) => error!("Failed to bind UDP socket: {e}"),
        }
        sleep(config.reconnect_delay).await;
    };

    while let Some(message) = rx.recv().await {
        let datagram = message.to_wire_json().into_bytes();
        if datagram.len() > MAX_UDP_PAYLOAD {
            warn!(
                "Dropping GELF message of [{}] bytes; exceeds the UDP payload limit",
                datagram.len()
            );
        } else if let Err(e) = socket.send(&datagram).await {
            // Datagrams are fire-and-forget; failed sends are not retried.
            error!("Failed to send GELF datagram to [{addr}]: {e}");
        }
        pending.fetch_sub(1, Ordering::AcqRel);
    }
    debug!("GELF writer for [{addr}] stopped");
}
