use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to the server
#[derive(Debug, Clone, Error)]
pub enum DriverError {
    /// Socket could not be opened, or failed mid-exchange
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Undecodable reply, or the peer closed before the terminator
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// The exchange did not finish within the configured timeout
    #[error("Timed out after {0:?}")]
    TimeoutError(Duration),

    /// The reply grew past the configured maximum size
    #[error("Response too large: exceeded {limit} bytes")]
    ResponseTooLarge { limit: usize },

    /// A query failed; `source` holds the underlying cause
    #[error("Query '{query}' failed: {source}")]
    QueryError {
        query: String,
        #[source]
        source: Box<DriverError>,
    },

    /// Arguments that cannot be framed on the wire
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// The server answered with `ERR <message>`
    #[error("Server error: {0}")]
    ServerError(String),

    /// The reply did not have the shape the caller expected
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl DriverError {
    pub(crate) fn query(query: impl Into<String>, source: DriverError) -> Self {
        DriverError::QueryError {
            query: query.into(),
            source: Box::new(source),
        }
    }

    /// Short name of the error kind, used in operator-facing output
    pub fn kind(&self) -> &'static str {
        match self {
            DriverError::ConnectionError(_) => "ConnectionError",
            DriverError::ProtocolError(_) => "ProtocolError",
            DriverError::TimeoutError(_) => "TimeoutError",
            DriverError::ResponseTooLarge { .. } => "ResponseTooLarge",
            DriverError::QueryError { .. } => "QueryError",
            DriverError::InvalidCommand(_) => "InvalidCommand",
            DriverError::ServerError(_) => "ServerError",
            DriverError::InvalidResponse(_) => "InvalidResponse",
        }
    }
}
