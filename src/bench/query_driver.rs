use crate::client::HyperionClient;
use crate::protocol::{parse_document_array, DriverError, Filter, Operator};
use std::time::{Duration, Instant};

/// Size and latency of one query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryOutcome {
    pub count: usize,
    pub elapsed: Duration,
}

impl QueryOutcome {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

#[derive(Debug, Clone)]
pub struct QueryReport {
    pub filter: Filter,
    pub result: Result<QueryOutcome, DriverError>,
}

/// The queries the tool runs when none are given
pub fn default_queries() -> Vec<Filter> {
    vec![
        Filter::new("currency", Operator::Eq, "PKR"),
        Filter::new("name", Operator::Contains, "Gaston"),
        Filter::new("price", Operator::Gt, "100"),
        Filter::new("price", Operator::Lt, "300"),
        Filter::new("specs.processor", Operator::Eq, "Dual-core"),
    ]
}

/// Single-shot filtered queries: one request each, no repeated trials
pub struct QueryDriver {
    client: HyperionClient,
}

impl QueryDriver {
    pub fn new(client: HyperionClient) -> Self {
        Self { client }
    }

    /// Build a filter from its parts and run it once
    pub async fn run_query(
        &self,
        field: &str,
        operator: Operator,
        value: &str,
    ) -> Result<QueryOutcome, DriverError> {
        self.run_filter(&Filter::new(field, operator, value)).await
    }

    /// Send the query once and count the documents in the reply.
    ///
    /// Any failure, including a reply that is not a JSON array, comes back
    /// as [`DriverError::QueryError`].
    pub async fn run_filter(&self, filter: &Filter) -> Result<QueryOutcome, DriverError> {
        let start = Instant::now();
        let text = self
            .client
            .query_raw(filter)
            .await
            .map_err(|e| DriverError::query(filter.to_string(), e))?;
        let elapsed = start.elapsed();

        let documents =
            parse_document_array(&text).map_err(|e| DriverError::query(filter.to_string(), e))?;

        Ok(QueryOutcome {
            count: documents.len(),
            elapsed,
        })
    }

    /// Run every query in order. A failed query is logged and recorded;
    /// the remaining queries still run.
    pub async fn run_all(&self, filters: &[Filter]) -> Vec<QueryReport> {
        let mut reports = Vec::with_capacity(filters.len());
        for filter in filters {
            let result = self.run_filter(filter).await;
            match &result {
                Ok(outcome) => tracing::info!(
                    "Query {}: {} records in {:.4}s",
                    filter,
                    outcome.count,
                    outcome.elapsed_secs()
                ),
                Err(e) => tracing::error!(
                    field = %filter.field,
                    operator = %filter.operator,
                    value = %filter.value,
                    "Query failed: {}",
                    e
                ),
            }
            reports.push(QueryReport {
                filter: filter.clone(),
                result,
            });
        }
        reports
    }
}
