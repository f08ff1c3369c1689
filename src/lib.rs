//! HyperionDB benchmark client
//!
//! Client for the HyperionDB newline-terminated text protocol, plus the
//! drivers that measure it: batched upsert/delete/scan latency averaged over
//! repeated trials, and single-shot filtered queries with result counts.
//!
//! # Example
//!
//! ```rust,no_run
//! use hyperion_bench::{BenchmarkDriver, Dataset, HyperionClientBuilder, Operation};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), hyperion_bench::BenchError> {
//!     let client = HyperionClientBuilder::new("127.0.0.1:8080")
//!         .timeout_ms(5_000)
//!         .build()?;
//!
//!     let dataset = Dataset::articles(1_000);
//!     let driver = BenchmarkDriver::new(client, 5)?;
//!     let measurement = driver.run(Operation::Insert, &dataset, 1_000).await?;
//!     println!("insert, 1000, {:?}", measurement.average_ms());
//!     Ok(())
//! }
//! ```

pub mod bench;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;

pub use bench::{
    BenchmarkDriver, BenchmarkResults, Dataset, Measurement, Operation, QueryDriver, QueryOutcome,
};
pub use client::{HyperionClient, HyperionClientBuilder};
pub use config::BenchConfig;
pub use error::{BenchError, BenchResult};
pub use protocol::{Command, DriverError, Filter, Operator, Record, Reply};
