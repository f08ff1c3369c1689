//! Hand-off to the reporting side.
//!
//! Rendering charts is not this crate's job; reporters receive the finished
//! [`BenchmarkResults`] and write them out as text or JSON.

use super::measurement::{BatchMeasurement, BenchmarkResults, Measurement};
use super::query_driver::QueryReport;
use crate::error::BenchResult;
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

pub trait Reporter {
    fn report(&mut self, results: &BenchmarkResults) -> BenchResult<()>;
}

pub fn format_duration(d: Duration) -> String {
    if d.as_secs() > 0 {
        format!("{:.2}s", d.as_secs_f64())
    } else if d.as_millis() > 0 {
        format!("{:.2}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.2}µs", d.as_secs_f64() * 1_000_000.0)
    }
}

/// `operation, batch_size, average_ms`
pub fn format_result_line(entry: &BatchMeasurement) -> String {
    match &entry.measurement {
        Measurement::Complete { .. } => format!(
            "{}, {}, {:.3}",
            entry.operation,
            entry.batch_size,
            entry.measurement.average_ms().unwrap_or_default()
        ),
        Measurement::Partial {
            attempted, error, ..
        } => format!(
            "{}, {}, partial ({}/{} trials succeeded): {}",
            entry.operation,
            entry.batch_size,
            entry.measurement.succeeded(),
            attempted,
            error
        ),
    }
}

pub fn format_query_report(report: &QueryReport) -> String {
    match &report.result {
        Ok(outcome) => format!(
            "Query: {}\nRecords: {}\nQuery time: {:.4} s ({})",
            report.filter,
            outcome.count,
            outcome.elapsed_secs(),
            format_duration(outcome.elapsed)
        ),
        Err(e) => format!("Query {} failed: {}", report.filter, e),
    }
}

/// Table of averages, one row per (operation, batch size)
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    /// Write the table to `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn report(&mut self, results: &BenchmarkResults) -> BenchResult<()> {
        writeln!(
            self.out,
            "  {:<10} {:>10} {:>14} {:>8}",
            "operation", "batch", "avg (ms)", "trials"
        )?;
        writeln!(self.out, "{}", "-".repeat(48))?;
        for entry in results.iter() {
            let m = &entry.measurement;
            let avg = match m.average_ms() {
                Some(avg) => format!("{:.3}", avg),
                None => "partial".to_string(),
            };
            writeln!(
                self.out,
                "  {:<10} {:>10} {:>14} {:>8}",
                entry.operation.as_str(),
                entry.batch_size,
                avg,
                format!("{}/{}", m.succeeded(), m.attempted())
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Writes averages and per-measurement detail as one JSON document
pub struct JsonReporter {
    path: PathBuf,
}

impl JsonReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Reporter for JsonReporter {
    fn report(&mut self, results: &BenchmarkResults) -> BenchResult<()> {
        let document = json!({
            "averages_ms": results.averages(),
            "measurements": results.summaries(),
        });
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &document)?;
        writer.flush()?;
        tracing::info!("Wrote benchmark results to {}", self.path.display());
        Ok(())
    }
}
