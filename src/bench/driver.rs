use super::dataset::Dataset;
use super::measurement::{BatchMeasurement, BenchmarkResults, Measurement};
use super::operation::Operation;
use crate::client::HyperionClient;
use crate::config::BenchConfig;
use crate::error::{BenchError, BenchResult};
use crate::protocol::{server_error, Command};
use std::time::Instant;

/// Value written into `content` by the update workload
pub const UPDATE_SENTINEL: &str = "Updated Content";

pub const DEFAULT_TRIALS: usize = 5;

/// Measures average latency of batched operations.
///
/// Trials run one after another on the caller's task; each trial is a
/// full request through [`HyperionClient::send_command`], connection setup
/// included.
pub struct BenchmarkDriver {
    client: HyperionClient,
    trials: usize,
}

impl BenchmarkDriver {
    /// Create a driver that runs exactly `trials` trials per measurement.
    ///
    /// Zero trials is rejected with [`BenchError::Config`].
    pub fn new(client: HyperionClient, trials: usize) -> BenchResult<Self> {
        if trials == 0 {
            return Err(BenchError::Config(
                "trials_per_measurement must be at least 1".to_string(),
            ));
        }
        Ok(Self { client, trials })
    }

    /// Validate the config and build a driver from it
    pub fn from_config(config: &BenchConfig) -> BenchResult<Self> {
        config.validate()?;
        Self::new(config.client()?, config.trials_per_measurement)
    }

    pub fn client(&self) -> &HyperionClient {
        &self.client
    }

    /// Trials per measurement
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Build the command an operation sends for a batch of the dataset.
    pub fn build_command(
        operation: Operation,
        dataset: &Dataset,
        batch_size: usize,
    ) -> BenchResult<Command> {
        let command = match operation {
            Operation::Insert => Command::InsertOrUpdateMany {
                records: dataset.batch(batch_size)?.to_vec(),
            },
            Operation::Update => Command::InsertOrUpdateMany {
                records: dataset
                    .batch(batch_size)?
                    .iter()
                    .cloned()
                    .map(|record| record.with_field("content", UPDATE_SENTINEL))
                    .collect(),
            },
            Operation::Query => Command::List,
            Operation::Delete => Command::DeleteMany {
                keys: dataset.keys(batch_size)?,
            },
        };
        Ok(command)
    }

    /// Run `trials` timed executions of one operation at one batch size.
    ///
    /// Errors building the command are returned directly. A failing trial
    /// stops the set and yields [`Measurement::Partial`].
    pub async fn run(
        &self,
        operation: Operation,
        dataset: &Dataset,
        batch_size: usize,
    ) -> BenchResult<Measurement> {
        let command = Self::build_command(operation, dataset, batch_size)?;
        let line = command.encode()?;

        let mut samples_ms = Vec::with_capacity(self.trials);
        for trial in 1..=self.trials {
            let start = Instant::now();
            let result = self.client.send_command(&line).await;
            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

            match result {
                Ok(reply) => {
                    if server_error(&reply).is_some() {
                        tracing::warn!(
                            "{} batch={} trial={}: server replied '{}'",
                            operation,
                            batch_size,
                            trial,
                            reply
                        );
                    }
                    samples_ms.push(elapsed_ms);
                }
                Err(error) => {
                    tracing::warn!(
                        "{} batch={} aborted at trial {}/{}: {}",
                        operation,
                        batch_size,
                        trial,
                        self.trials,
                        error
                    );
                    return Ok(Measurement::Partial {
                        samples_ms,
                        attempted: trial,
                        error,
                    });
                }
            }
        }

        let measurement = Measurement::Complete { samples_ms };
        if let Some(avg) = measurement.average_ms() {
            tracing::info!("{}, {}, {:.3} ms", operation, batch_size, avg);
        }
        Ok(measurement)
    }

    /// Measure every operation at every batch size.
    ///
    /// Batch sizes form the outer loop. `on_result` sees each measurement
    /// as soon as it is taken.
    pub async fn run_suite<F>(
        &self,
        dataset: &Dataset,
        batch_sizes: &[usize],
        operations: &[Operation],
        mut on_result: F,
    ) -> BenchResult<BenchmarkResults>
    where
        F: FnMut(&BatchMeasurement),
    {
        let mut results = BenchmarkResults::new();
        for &batch_size in batch_sizes {
            for &operation in operations {
                let measurement = self.run(operation, dataset, batch_size).await?;
                let entry = BatchMeasurement {
                    operation,
                    batch_size,
                    measurement,
                };
                on_result(&entry);
                results.record(entry);
            }
        }
        Ok(results)
    }
}
