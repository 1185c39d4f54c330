//! Outbound transports for parameter records.

use crate::{expression::ParameterRecord, Error, Result};
use log::{debug, info};
use serde::Serialize;
use std::net::{SocketAddr, UdpSocket};

/// Sink for parameter records, opened once and closed once
pub trait Transport {
    /// Send one record, best effort
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the record could not be handed to the network
    fn send(&mut self, record: &ParameterRecord) -> Result<()>;

    /// Release the underlying resources
    ///
    /// # Errors
    ///
    /// Returns `Transport` if shutdown fails
    fn close(&mut self) -> Result<()>;
}

#[derive(Serialize)]
struct Envelope<'a> {
    event: &'a str,
    data: &'a ParameterRecord,
}

/// Encode a record as the renderer's event envelope
///
/// # Errors
///
/// Returns `Json` if serialization fails
pub fn encode_event(event: &str, record: &ParameterRecord) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&Envelope { event, data: record })?)
}

/// Sends one JSON datagram per record over a connected, non-blocking UDP socket
#[derive(Debug)]
pub struct UdpTransport {
    socket: Option<UdpSocket>,
    endpoint: SocketAddr,
    event: String,
    sent: u64,
}

impl UdpTransport {
    /// Connect to `endpoint`
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the endpoint is invalid or the socket cannot be set up
    pub fn connect(endpoint: &str, event: &str) -> Result<Self> {
        let endpoint: SocketAddr = endpoint
            .parse()
            .map_err(|e| Error::Transport(format!("Invalid endpoint '{endpoint}': {e}")))?;
        let bind_addr = if endpoint.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };

        let socket = UdpSocket::bind(bind_addr).map_err(|e| Error::Transport(format!("Bind failed: {e}")))?;
        socket
            .connect(endpoint)
            .map_err(|e| Error::Transport(format!("Connect to {endpoint} failed: {e}")))?;
        socket
            .set_nonblocking(true)
            .map_err(|e| Error::Transport(format!("Cannot make socket non-blocking: {e}")))?;

        info!("Sending '{}' events to {}", event, endpoint);
        Ok(Self {
            socket: Some(socket),
            endpoint,
            event: event.to_string(),
            sent: 0,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> SocketAddr {
        self.endpoint
    }

    /// Datagrams handed to the OS so far
    #[must_use]
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl Transport for UdpTransport {
    fn send(&mut self, record: &ParameterRecord) -> Result<()> {
        let socket = self
            .socket
            .as_ref()
            .ok_or_else(|| Error::Transport("Transport already closed".to_string()))?;
        let payload = encode_event(&self.event, record)?;
        socket
            .send(&payload)
            .map_err(|e| Error::Transport(format!("Send to {} failed: {}", self.endpoint, e)))?;
        self.sent += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.socket.take().is_some() {
            info!("Closed transport to {} after {} records", self.endpoint, self.sent);
        }
        Ok(())
    }
}

/// Writes every record to the log instead of the network
#[derive(Debug, Default)]
pub struct LogTransport {
    sent: u64,
}

impl LogTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl Transport for LogTransport {
    fn send(&mut self, record: &ParameterRecord) -> Result<()> {
        info!("{}", serde_json::to_string(record)?);
        self.sent += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        debug!("Log transport closed after {} records", self.sent);
        Ok(())
    }
}
