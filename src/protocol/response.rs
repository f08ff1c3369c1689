use super::error::DriverError;
use serde_json::Value;

/// A classified server reply.
///
/// The server answers with a bare status word, an `ERR` line, or a JSON
/// document/array.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Ok,
    Null,
    Bye,
    Error(String),
    Data(Value),
}

impl Reply {
    pub fn parse(text: &str) -> Result<Self, DriverError> {
        let text = text.trim();
        match text {
            "OK" => return Ok(Reply::Ok),
            "NULL" => return Ok(Reply::Null),
            "BYE" => return Ok(Reply::Bye),
            _ => {}
        }

        if let Some(message) = server_error(text) {
            return Ok(Reply::Error(message.to_string()));
        }

        serde_json::from_str(text)
            .map(Reply::Data)
            .map_err(|e| DriverError::InvalidResponse(format!("Expected JSON: {}", e)))
    }

    /// Surface `ERR` replies as errors
    pub fn into_result(self) -> Result<Reply, DriverError> {
        match self {
            Reply::Error(message) => Err(DriverError::ServerError(message)),
            other => Ok(other),
        }
    }
}

/// The message of an `ERR` reply, or `None` if `text` is anything else.
///
/// Both `ERR <message>` and a bare `ERR` count; `ERROR` does not.
pub fn server_error(text: &str) -> Option<&str> {
    let message = text.trim().strip_prefix("ERR")?;
    if message.is_empty() || message.starts_with(char::is_whitespace) {
        Some(message.trim())
    } else {
        None
    }
}

/// Parse reply text strictly as a JSON array of documents.
pub fn parse_document_array(text: &str) -> Result<Vec<Value>, DriverError> {
    if let Some(message) = server_error(text) {
        return Err(DriverError::ServerError(message.to_string()));
    }
    serde_json::from_str::<Vec<Value>>(text)
        .map_err(|e| DriverError::InvalidResponse(format!("Expected a JSON array: {}", e)))
}
