use super::HyperionClient;
use crate::protocol::{parse_document_array, Command, DriverError, Filter};
use serde_json::Value;

impl HyperionClient {
    /// Run `QUERY <field> <operator> <value>` and decode the matching documents.
    pub async fn query(&self, filter: &Filter) -> Result<Vec<Value>, DriverError> {
        let text = self.query_raw(filter).await?;
        parse_document_array(&text)
    }

    /// Same as [`query`](Self::query) but returns the undecoded reply.
    pub async fn query_raw(&self, filter: &Filter) -> Result<String, DriverError> {
        self.execute(&Command::Query(filter.clone())).await
    }
}
