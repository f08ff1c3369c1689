mod builder;
mod document;
mod query;

pub use builder::HyperionClientBuilder;

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use super::protocol::{
    encode_frame, Command, DriverError, ResponseBuffer, DEFAULT_MAX_RESPONSE_SIZE,
    READ_CHUNK_SIZE,
};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Line-protocol client.
///
/// Each request opens its own TCP connection, performs exactly one
/// request/response exchange and closes the socket before returning. There
/// is no pooling: the connect and teardown cost is part of every call.
#[derive(Debug, Clone)]
pub struct HyperionClient {
    addr: String,
    timeout: Option<Duration>,
    max_response_size: usize,
}

impl Default for HyperionClient {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl HyperionClient {
    /// Create a client for `host:port` with the default timeout and reply limit
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            addr: format!("{}:{}", host, port),
            timeout: Some(Duration::from_millis(DEFAULT_TIMEOUT_MS)),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }

    /// Server address as `host:port`
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Per-exchange timeout, `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Largest reply accepted, in bytes
    pub fn max_response_size(&self) -> usize {
        self.max_response_size
    }

    /// Send one command line and return the trimmed reply text.
    ///
    /// The reply is not interpreted; callers decide how to parse it.
    pub async fn send_command(&self, command: &str) -> Result<String, DriverError> {
        let frame = encode_frame(command)?;

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(&frame))
                .await
                .map_err(|_| DriverError::TimeoutError(limit))?,
            None => self.exchange(&frame).await,
        }
    }

    /// Encode a typed command and send it.
    pub async fn execute(&self, command: &Command) -> Result<String, DriverError> {
        let line = command.encode()?;
        tracing::debug!("{} -> {}", command, self.addr);
        self.send_command(&line).await
    }

    async fn exchange(&self, frame: &[u8]) -> Result<String, DriverError> {
        let mut stream = TcpStream::connect(&self.addr).await.map_err(|e| {
            DriverError::ConnectionError(format!("Failed to connect to {}: {}", self.addr, e))
        })?;

        stream.set_nodelay(true).map_err(|e| {
            DriverError::ConnectionError(format!("Failed to set TCP_NODELAY: {}", e))
        })?;

        stream
            .write_all(frame)
            .await
            .map_err(|e| DriverError::ConnectionError(format!("Write failed: {}", e)))?;

        let mut response = ResponseBuffer::new(self.max_response_size);
        let mut chunk = vec![0u8; READ_CHUNK_SIZE];
        loop {
            let n = stream
                .read(&mut chunk)
                .await
                .map_err(|e| DriverError::ConnectionError(format!("Read failed: {}", e)))?;
            if n == 0 {
                break;
            }
            if response.push(&chunk[..n])? {
                break;
            }
        }
        drop(stream);

        tracing::trace!("received {} bytes from {}", response.len(), self.addr);
        response.finish()
    }
}
