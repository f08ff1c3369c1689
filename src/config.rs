//! Benchmark run configuration
//!
//! Settings come from, in increasing precedence:
//!
//! 1. built-in defaults
//! 2. an optional `hyperion-bench.toml` file
//! 3. environment variables (a `.env` file is honoured)
//! 4. command-line flags
//!
//! ## Environment Variables
//!
//! - `HYPERION_HOST` - Server host
//! - `HYPERION_PORT` - Server port
//! - `HYPERION_TRIALS` - Trials per measurement

use crate::bench::{Operation, DEFAULT_TRIALS};
use crate::client::{HyperionClient, HyperionClientBuilder, DEFAULT_HOST, DEFAULT_PORT};
use crate::error::{BenchError, BenchResult};
use crate::protocol::{DriverError, DEFAULT_MAX_RESPONSE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "hyperion-bench.toml";

/// Environment variable names
pub const ENV_HOST: &str = "HYPERION_HOST";
pub const ENV_PORT: &str = "HYPERION_PORT";
pub const ENV_TRIALS: &str = "HYPERION_TRIALS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Trials averaged into each measurement
    pub trials_per_measurement: usize,
    /// Batch sizes, measured in this order
    pub batch_sizes: Vec<usize>,
    /// Operations measured at each batch size, in this order
    pub operations: Vec<Operation>,
    /// Number of generated records
    pub dataset_size: usize,
    /// Per-request timeout in milliseconds; 0 waits forever
    pub timeout_ms: u64,
    /// Largest accepted reply in bytes
    pub max_response_bytes: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            trials_per_measurement: DEFAULT_TRIALS,
            batch_sizes: vec![1_000, 10_000, 100_000],
            operations: Operation::ALL.to_vec(),
            dataset_size: 100_000,
            timeout_ms: 30_000,
            max_response_bytes: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }
}

impl BenchConfig {
    /// Load a TOML file; missing keys keep their defaults.
    pub fn load(path: &Path) -> BenchResult<Self> {
        if !path.exists() {
            return Err(BenchError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> BenchResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `HYPERION_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from any variable source. Empty or unparsable values
    /// are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            if !host.is_empty() {
                self.host = host;
            }
        }

        if let Some(port) = lookup(ENV_PORT).and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }

        if let Some(trials) = lookup(ENV_TRIALS).and_then(|t| t.parse::<usize>().ok()) {
            self.trials_per_measurement = trials;
        }
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.host.is_empty() {
            return Err(BenchError::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(BenchError::Config("port must not be 0".to_string()));
        }
        if self.trials_per_measurement == 0 {
            return Err(BenchError::Config(
                "trials_per_measurement must be at least 1".to_string(),
            ));
        }
        if self.batch_sizes.is_empty() {
            return Err(BenchError::Config(
                "at least one batch size is required".to_string(),
            ));
        }
        if let Some(&size) = self
            .batch_sizes
            .iter()
            .find(|&&s| s == 0 || s > self.dataset_size)
        {
            return Err(BenchError::Config(format!(
                "batch size {} must be between 1 and dataset_size ({})",
                size, self.dataset_size
            )));
        }
        if self.operations.is_empty() {
            return Err(BenchError::Config(
                "at least one operation is required".to_string(),
            ));
        }
        if self.max_response_bytes == 0 {
            return Err(BenchError::Config(
                "max_response_bytes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn client(&self) -> Result<HyperionClient, DriverError> {
        let builder =
            HyperionClientBuilder::new(&self.addr()).max_response_size(self.max_response_bytes);
        let builder = if self.timeout_ms == 0 {
            builder.no_timeout()
        } else {
            builder.timeout_ms(self.timeout_ms)
        };
        builder.build()
    }
}
