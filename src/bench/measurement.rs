use super::operation::Operation;
use crate::protocol::DriverError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of one (operation, batch size) measurement.
///
/// A trial set stops at its first failure. Such a set is `Partial` and
/// never reports a full average.
#[derive(Debug, Clone)]
pub enum Measurement {
    Complete {
        samples_ms: Vec<f64>,
    },
    Partial {
        samples_ms: Vec<f64>,
        attempted: usize,
        error: DriverError,
    },
}

impl Measurement {
    /// Mean of every trial; `None` unless all trials succeeded.
    pub fn average_ms(&self) -> Option<f64> {
        match self {
            Measurement::Complete { samples_ms } => mean(samples_ms),
            Measurement::Partial { .. } => None,
        }
    }

    /// Mean of the trials that did succeed, complete or not.
    pub fn successful_average_ms(&self) -> Option<f64> {
        mean(self.samples_ms())
    }

    /// Elapsed milliseconds of each completed trial
    pub fn samples_ms(&self) -> &[f64] {
        match self {
            Measurement::Complete { samples_ms } | Measurement::Partial { samples_ms, .. } => {
                samples_ms
            }
        }
    }

    pub fn succeeded(&self) -> usize {
        self.samples_ms().len()
    }

    /// Trials started, including the one that failed
    pub fn attempted(&self) -> usize {
        match self {
            Measurement::Complete { samples_ms } => samples_ms.len(),
            Measurement::Partial { attempted, .. } => *attempted,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Measurement::Complete { .. })
    }

    /// The error that ended a partial set
    pub fn error(&self) -> Option<&DriverError> {
        match self {
            Measurement::Complete { .. } => None,
            Measurement::Partial { error, .. } => Some(error),
        }
    }
}

fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

/// A measurement tagged with what was measured
#[derive(Debug, Clone)]
pub struct BatchMeasurement {
    pub operation: Operation,
    pub batch_size: usize,
    pub measurement: Measurement,
}

/// Flat, serializable view of a [`BatchMeasurement`]
#[derive(Debug, Clone, Serialize)]
pub struct MeasurementSummary {
    pub operation: Operation,
    pub batch_size: usize,
    pub status: &'static str,
    /// Mean over all trials; `None` unless every trial completed
    pub average_ms: Option<f64>,
    /// Mean over the trials that completed, partial sets included
    pub successful_average_ms: Option<f64>,
    pub succeeded: usize,
    pub attempted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&BatchMeasurement> for MeasurementSummary {
    fn from(m: &BatchMeasurement) -> Self {
        Self {
            operation: m.operation,
            batch_size: m.batch_size,
            status: if m.measurement.is_complete() {
                "complete"
            } else {
                "partial"
            },
            average_ms: m.measurement.average_ms(),
            successful_average_ms: m.measurement.successful_average_ms(),
            succeeded: m.measurement.succeeded(),
            attempted: m.measurement.attempted(),
            error: m.measurement.error().map(|e| e.to_string()),
        }
    }
}

/// Results of a run, keyed by operation and ordered by batch size
#[derive(Debug, Clone, Default)]
pub struct BenchmarkResults {
    by_operation: BTreeMap<Operation, Vec<BatchMeasurement>>,
}

impl BenchmarkResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, keeping each operation's entries ordered by batch size
    pub fn record(&mut self, entry: BatchMeasurement) {
        let entries = self.by_operation.entry(entry.operation).or_default();
        let at = entries.partition_point(|e| e.batch_size <= entry.batch_size);
        entries.insert(at, entry);
    }

    /// Entries for one operation, smallest batch first
    pub fn get(&self, operation: Operation) -> &[BatchMeasurement] {
        self.by_operation
            .get(&operation)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &BatchMeasurement> {
        self.by_operation.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_operation.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `{operation -> [average_ms per batch size]}` for the reporting side.
    /// Partial measurements appear as `None`.
    pub fn averages(&self) -> BTreeMap<String, Vec<Option<f64>>> {
        self.by_operation
            .iter()
            .map(|(op, entries)| {
                (
                    op.to_string(),
                    entries.iter().map(|e| e.measurement.average_ms()).collect(),
                )
            })
            .collect()
    }

    pub fn summaries(&self) -> Vec<MeasurementSummary> {
        self.iter().map(MeasurementSummary::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(op: Operation, batch_size: usize, samples: &[f64]) -> BatchMeasurement {
        BatchMeasurement {
            operation: op,
            batch_size,
            measurement: Measurement::Complete {
                samples_ms: samples.to_vec(),
            },
        }
    }

    #[test]
    fn test_complete_average() {
        let m = Measurement::Complete {
            samples_ms: vec![10.0, 20.0, 30.0, 40.0, 50.0],
        };
        assert_eq!(m.average_ms(), Some(30.0));
        assert_eq!(m.succeeded(), 5);
        assert_eq!(m.attempted(), 5);
        assert!(m.error().is_none());
    }

    #[test]
    fn test_partial_has_no_full_average() {
        let m = Measurement::Partial {
            samples_ms: vec![10.0, 20.0],
            attempted: 3,
            error: DriverError::ConnectionError("reset".to_string()),
        };
        assert_eq!(m.average_ms(), None);
        assert_eq!(m.successful_average_ms(), Some(15.0));
        assert_eq!(m.succeeded(), 2);
        assert_eq!(m.attempted(), 3);
        assert!(!m.is_complete());
    }

    #[test]
    fn test_results_ordered_by_batch_size() {
        let mut results = BenchmarkResults::new();
        results.record(complete(Operation::Insert, 10_000, &[2.0]));
        results.record(complete(Operation::Insert, 1_000, &[1.0]));
        results.record(complete(Operation::Insert, 100_000, &[3.0]));
        results.record(complete(Operation::Query, 1_000, &[4.0]));

        let sizes: Vec<usize> = results
            .get(Operation::Insert)
            .iter()
            .map(|e| e.batch_size)
            .collect();
        assert_eq!(sizes, vec![1_000, 10_000, 100_000]);
        assert_eq!(results.len(), 4);
        assert!(results.get(Operation::Delete).is_empty());

        let averages = results.averages();
        assert_eq!(averages["insert"], vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(averages["query"], vec![Some(4.0)]);
        assert!(!averages.contains_key("delete"));
    }

    #[test]
    fn test_summary_of_partial() {
        let entry = BatchMeasurement {
            operation: Operation::Delete,
            batch_size: 1_000,
            measurement: Measurement::Partial {
                samples_ms: vec![10.0, 20.0],
                attempted: 3,
                error: DriverError::TimeoutError(std::time::Duration::from_secs(1)),
            },
        };
        let summary = MeasurementSummary::from(&entry);
        assert_eq!(summary.status, "partial");
        assert_eq!(summary.average_ms, None);
        assert_eq!(summary.successful_average_ms, Some(15.0));
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.error.as_deref(), Some("Timed out after 1s"));

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["average_ms"].is_null());
        assert_eq!(json["successful_average_ms"], 15.0);
    }
}
