use super::HyperionClient;
use crate::protocol::{
    parse_document_array, server_error, Command, DriverError, Record, Reply,
};
use serde_json::Value;

impl HyperionClient {
    /// Store one document under `key`
    pub async fn insert(&self, key: &str, value: Value) -> Result<(), DriverError> {
        let text = self
            .execute(&Command::Insert {
                key: key.to_string(),
                value,
            })
            .await?;
        expect_ok(&text)
    }

    /// Returns `None` when the server answers `NULL`.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, DriverError> {
        let text = self
            .execute(&Command::Get {
                key: key.to_string(),
            })
            .await?;
        match Reply::parse(&text)?.into_result()? {
            Reply::Null => Ok(None),
            Reply::Data(value) => Ok(Some(value)),
            other => Err(DriverError::InvalidResponse(format!(
                "Unexpected reply to GET: {:?}",
                other
            ))),
        }
    }

    /// Delete the document stored under `key`
    pub async fn delete(&self, key: &str) -> Result<(), DriverError> {
        let text = self
            .execute(&Command::Delete {
                key: key.to_string(),
            })
            .await?;
        expect_ok(&text)
    }

    /// Fetch every document
    pub async fn list(&self) -> Result<Vec<Value>, DriverError> {
        let text = self.execute(&Command::List).await?;
        parse_document_array(&text)
    }

    /// Upsert a batch. Returns the raw reply text.
    pub async fn insert_or_update_many(&self, records: &[Record]) -> Result<String, DriverError> {
        let text = self
            .execute(&Command::InsertOrUpdateMany {
                records: records.to_vec(),
            })
            .await?;
        reject_error_reply(text)
    }

    /// Delete a batch by key. Returns the raw reply text.
    pub async fn delete_many(&self, keys: &[String]) -> Result<String, DriverError> {
        let text = self
            .execute(&Command::DeleteMany {
                keys: keys.to_vec(),
            })
            .await?;
        reject_error_reply(text)
    }
}

fn expect_ok(text: &str) -> Result<(), DriverError> {
    match Reply::parse(text)?.into_result()? {
        Reply::Ok => Ok(()),
        other => Err(DriverError::InvalidResponse(format!(
            "Expected OK, got {:?}",
            other
        ))),
    }
}

fn reject_error_reply(text: String) -> Result<String, DriverError> {
    match server_error(&text) {
        Some(message) => Err(DriverError::ServerError(message.to_string())),
        None => Ok(text),
    }
}
