//! Wire protocol definitions for the HyperionDB line protocol
//!
//! Every request is a single line `VERB <args>` terminated by `\n`; every
//! reply is read until a chunk carrying `\n` arrives or the peer closes.

pub mod codec;
pub mod command;
pub mod error;
pub mod response;
pub mod types;

pub use codec::{encode_frame, ResponseBuffer, DEFAULT_MAX_RESPONSE_SIZE, READ_CHUNK_SIZE};
pub use command::Command;
pub use error::DriverError;
pub use response::{parse_document_array, server_error, Reply};
pub use types::{Filter, Operator, Record};
