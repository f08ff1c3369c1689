//! Benchmark and query drivers
//!
//! `BenchmarkDriver` times batched upserts, deletes and full scans over
//! repeated trials; `QueryDriver` times single filtered queries and counts
//! their results.

pub mod dataset;
pub mod driver;
pub mod measurement;
pub mod operation;
pub mod query_driver;
pub mod report;

pub use dataset::Dataset;
pub use driver::{BenchmarkDriver, DEFAULT_TRIALS, UPDATE_SENTINEL};
pub use measurement::{BatchMeasurement, BenchmarkResults, Measurement, MeasurementSummary};
pub use operation::Operation;
pub use query_driver::{default_queries, QueryDriver, QueryOutcome, QueryReport};
pub use report::{
    format_duration, format_query_report, format_result_line, JsonReporter, Reporter,
    TextReporter,
};
