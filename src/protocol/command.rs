use super::error::DriverError;
use super::types::{Filter, Record};
use serde_json::Value;
use std::fmt;

/// Commands that can be sent to the server.
///
/// Every command encodes to a single line `VERB <args>`; the newline
/// terminator is added by the framing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Store one document under `key`
    Insert { key: String, value: Value },

    /// Fetch one document by key
    Get { key: String },

    /// Remove one document by key
    Delete { key: String },

    /// Return every stored document
    List,

    /// Return the documents matching a simple predicate
    Query(Filter),

    /// Upsert a batch of records keyed by `_id`
    InsertOrUpdateMany { records: Vec<Record> },

    /// Remove a batch of records by key
    DeleteMany { keys: Vec<String> },

    /// Ask the server to end the session
    Exit,
}

impl Command {
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Insert { .. } => "INSERT",
            Command::Get { .. } => "GET",
            Command::Delete { .. } => "DELETE",
            Command::List => "LIST",
            Command::Query(_) => "QUERY",
            Command::InsertOrUpdateMany { .. } => "INSERT_OR_UPDATE_MANY",
            Command::DeleteMany { .. } => "DELETE_MANY",
            Command::Exit => "EXIT",
        }
    }

    /// Encode to wire text, without the terminator.
    pub fn encode(&self) -> Result<String, DriverError> {
        let line = match self {
            Command::Insert { key, value } => {
                validate_key(key)?;
                format!("{} {} {}", self.verb(), key, to_json(value)?)
            }
            Command::Get { key } | Command::Delete { key } => {
                validate_key(key)?;
                format!("{} {}", self.verb(), key)
            }
            Command::List | Command::Exit => self.verb().to_string(),
            Command::Query(filter) => {
                filter.validate()?;
                format!("{} {}", self.verb(), filter)
            }
            Command::InsertOrUpdateMany { records } => {
                format!("{} {}", self.verb(), to_json(records)?)
            }
            Command::DeleteMany { keys } => {
                format!("{} {}", self.verb(), to_json(keys)?)
            }
        };

        if line.contains(['\n', '\r']) {
            return Err(DriverError::InvalidCommand(format!(
                "{} command contains a line break",
                self.verb()
            )));
        }
        Ok(line)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Insert { key, .. } | Command::Get { key } | Command::Delete { key } => {
                write!(f, "{} {}", self.verb(), key)
            }
            Command::Query(filter) => write!(f, "{} {}", self.verb(), filter),
            Command::InsertOrUpdateMany { records } => {
                write!(f, "{} ({} records)", self.verb(), records.len())
            }
            Command::DeleteMany { keys } => write!(f, "{} ({} keys)", self.verb(), keys.len()),
            Command::List | Command::Exit => f.write_str(self.verb()),
        }
    }
}

fn validate_key(key: &str) -> Result<(), DriverError> {
    if key.is_empty() || key.chars().any(char::is_whitespace) {
        return Err(DriverError::InvalidCommand(format!(
            "Key '{}' must be non-empty and contain no whitespace",
            key
        )));
    }
    Ok(())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, DriverError> {
    serde_json::to_string(value)
        .map_err(|e| DriverError::InvalidCommand(format!("Serialization failed: {}", e)))
}
