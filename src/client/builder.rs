use super::{DriverError, HyperionClient, DEFAULT_TIMEOUT_MS};
use crate::protocol::DEFAULT_MAX_RESPONSE_SIZE;
use std::time::Duration;

/// Builder for creating a [`HyperionClient`] with additional options
pub struct HyperionClientBuilder {
    addr: String,
    timeout_ms: Option<u64>,
    max_response_size: Option<usize>,
}

impl HyperionClientBuilder {
    /// Create a new builder
    pub fn new(addr: &str) -> Self {
        Self {
            addr: addr.to_string(),
            timeout_ms: Some(DEFAULT_TIMEOUT_MS),
            max_response_size: None,
        }
    }

    /// Set exchange timeout in milliseconds
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    /// Wait forever for each exchange
    pub fn no_timeout(mut self) -> Self {
        self.timeout_ms = None;
        self
    }

    /// Set the largest reply accepted, in bytes
    pub fn max_response_size(mut self, bytes: usize) -> Self {
        self.max_response_size = Some(bytes);
        self
    }

    /// Build the client. Nothing is connected until the first request.
    pub fn build(self) -> Result<HyperionClient, DriverError> {
        let (host, port) = self.addr.rsplit_once(':').ok_or_else(|| {
            DriverError::ConnectionError(format!(
                "Invalid address '{}': expected host:port",
                self.addr
            ))
        })?;

        if host.is_empty() {
            return Err(DriverError::ConnectionError(format!(
                "Invalid address '{}': missing host",
                self.addr
            )));
        }

        let port: u16 = port.parse().map_err(|_| {
            DriverError::ConnectionError(format!(
                "Invalid address '{}': bad port '{}'",
                self.addr, port
            ))
        })?;

        let max_response_size = self.max_response_size.unwrap_or(DEFAULT_MAX_RESPONSE_SIZE);
        if max_response_size == 0 {
            return Err(DriverError::InvalidCommand(
                "max_response_size must be at least 1 byte".to_string(),
            ));
        }

        let mut client = HyperionClient::new(host, port);
        client.timeout = self.timeout_ms.map(Duration::from_millis);
        client.max_response_size = max_response_size;
        Ok(client)
    }
}
