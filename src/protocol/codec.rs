use super::error::DriverError;

/// Message terminator for both directions
pub const TERMINATOR: u8 = b'\n';

/// Size of each socket read
pub const READ_CHUNK_SIZE: usize = 4096;

/// Default cap on an accumulated reply (128 MB)
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 128 * 1024 * 1024;

/// Frame a command line for the wire: command bytes plus one newline.
pub fn encode_frame(command: &str) -> Result<Vec<u8>, DriverError> {
    if command.contains(['\n', '\r']) {
        return Err(DriverError::InvalidCommand(
            "Command must not contain a line break".to_string(),
        ));
    }

    let mut buf = Vec::with_capacity(command.len() + 1);
    buf.extend_from_slice(command.as_bytes());
    buf.push(TERMINATOR);
    Ok(buf)
}

/// Accumulates reply chunks until one of them carries the terminator.
///
/// Bytes after the first newline in the final chunk are kept; only the
/// surrounding whitespace of the whole reply is trimmed on decode.
#[derive(Debug)]
pub struct ResponseBuffer {
    buf: Vec<u8>,
    max_size: usize,
    terminated: bool,
}

impl ResponseBuffer {
    pub fn new(max_size: usize) -> Self {
        Self {
            buf: Vec::new(),
            max_size,
            terminated: false,
        }
    }

    /// Append a chunk. Returns `true` once the reply is complete.
    pub fn push(&mut self, chunk: &[u8]) -> Result<bool, DriverError> {
        if self.buf.len() + chunk.len() > self.max_size {
            return Err(DriverError::ResponseTooLarge {
                limit: self.max_size,
            });
        }
        self.buf.extend_from_slice(chunk);
        if chunk.contains(&TERMINATOR) {
            self.terminated = true;
        }
        Ok(self.terminated)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Decode the accumulated bytes as UTF-8 text with whitespace trimmed.
    ///
    /// Fails if the peer closed before any terminator was seen.
    pub fn finish(self) -> Result<String, DriverError> {
        if !self.terminated {
            return Err(DriverError::ProtocolError(if self.buf.is_empty() {
                "Connection closed without a response".to_string()
            } else {
                format!(
                    "Connection closed after {} bytes without a line terminator",
                    self.buf.len()
                )
            }));
        }

        let text = String::from_utf8(self.buf)
            .map_err(|e| DriverError::ProtocolError(format!("Response is not UTF-8: {}", e)))?;
        Ok(text.trim().to_string())
    }
}
