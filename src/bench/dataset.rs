//! Benchmark datasets
//!
//! A dataset is generated (or loaded) once per run and then only sliced:
//! every operation at every batch size reads a prefix of the same records.

use crate::error::{BenchError, BenchResult};
use crate::protocol::Record;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use rand::Rng;
use serde_json::json;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

const ARTICLE_CREATED_AT: &str = "2013-06-24T12:47:01.308Z";
const ARTICLE_CONTENT: &str = "Plunketts Creek Bridge...";

const FIRST_NAMES: [&str; 10] = [
    "Gaston", "Alice", "Bruno", "Chloe", "Diego", "Emma", "Farid", "Greta", "Hiro", "Ines",
];
const LAST_NAMES: [&str; 8] = [
    "Lagaffe", "Martin", "Smith", "Garcia", "Khan", "Tanaka", "Rossi", "Novak",
];
const CATEGORIES: [&str; 5] = ["Electronics", "Clothing", "Books", "Home", "Toys"];
const PROCESSORS: [&str; 3] = ["Quad-core", "Octa-core", "Dual-core"];
const RAM_OPTIONS: [&str; 3] = ["8GB", "16GB", "32GB"];
const CURRENCIES: [&str; 6] = ["USD", "EUR", "PKR", "JPY", "GBP", "INR"];
const CITIES: [&str; 10] = [
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "Philadelphia",
    "San Antonio",
    "San Diego",
    "Dallas",
    "San Jose",
];
const WORDS: [&str; 12] = [
    "fast", "reliable", "compact", "durable", "modern", "classic", "portable", "smart", "quiet",
    "bright", "light", "sturdy",
];

/// Ordered, immutable sequence of records with unique `_id`s
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Wrap records, rejecting duplicate `_id`s
    pub fn new(records: Vec<Record>) -> BenchResult<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(BenchError::InvalidDataset(format!(
                    "duplicate _id '{}'",
                    record.id
                )));
            }
        }
        Ok(Self { records })
    }

    /// Article records: `id_{i}` keyed, identical shape across the run.
    pub fn articles(count: usize) -> Self {
        let records = (0..count)
            .map(|i| {
                Record::new(format!("id_{}", i))
                    .with_field("article_id", format!("article_{}", i))
                    .with_field("author", format!("author_{}", i))
                    .with_field("email", format!("author_{}@example.com", i))
                    .with_field("created_at", ARTICLE_CREATED_AT)
                    .with_field("title", format!("title_{}", i))
                    .with_field("content", ARTICLE_CONTENT)
            })
            .collect();
        Self { records }
    }

    /// Randomised product catalogue records keyed `prod{i}`.
    pub fn products<R: Rng>(count: usize, rng: &mut R) -> Self {
        let records = (0..count).map(|i| generate_product(i, rng)).collect();
        Self { records }
    }

    /// Load a JSON array of records.
    pub fn from_json_file(path: &Path) -> BenchResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let records: Vec<Record> = serde_json::from_reader(reader)?;
        Self::new(records)
    }

    /// Save the records as a pretty-printed JSON array
    pub fn write_json_file(&self, path: &Path) -> BenchResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, &self.records)?;
        Ok(())
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The first `size` records.
    pub fn batch(&self, size: usize) -> BenchResult<&[Record]> {
        self.records
            .get(..size)
            .ok_or(BenchError::BatchTooLarge {
                requested: size,
                available: self.records.len(),
            })
    }

    /// The `_id`s of the first `size` records.
    pub fn keys(&self, size: usize) -> BenchResult<Vec<String>> {
        Ok(self.batch(size)?.iter().map(|r| r.id.clone()).collect())
    }
}

fn pick<'a, R: Rng>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

fn generate_product<R: Rng>(id: usize, rng: &mut R) -> Record {
    let name = format!("{} {}", pick(rng, &FIRST_NAMES), pick(rng, &LAST_NAMES));
    let description = (0..rng.gen_range(5..10))
        .map(|_| pick(rng, &WORDS))
        .collect::<Vec<_>>()
        .join(" ");
    let price: f64 = (rng.gen_range(10.0..500.0_f64) * 100.0).round() / 100.0;

    let epoch = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).single().unwrap_or_default();
    let created_at = epoch + ChronoDuration::seconds(rng.gen_range(0..300_000_000));

    Record::new(format!("prod{}", id))
        .with_field("name", name)
        .with_field("description", description)
        .with_field("price", price)
        .with_field("currency", pick(rng, &CURRENCIES))
        .with_field("category", pick(rng, &CATEGORIES))
        .with_field("sku", format!("SKU{:06}", rng.gen_range(0..1_000_000)))
        .with_field("stock", rng.gen_range(0..200u32))
        .with_field("city", pick(rng, &CITIES))
        .with_field(
            "specs",
            json!({
                "processor": pick(rng, &PROCESSORS),
                "ram": pick(rng, &RAM_OPTIONS),
                "battery": format!("{} mAh", rng.gen_range(2000..5000)),
            }),
        )
        .with_field(
            "warehouses",
            json!({
                "warehouse1": rng.gen_range(0..100),
                "warehouse2": rng.gen_range(0..100),
            }),
        )
        .with_field("in_stock", rng.gen_bool(0.5))
        .with_field("created_at", created_at.to_rfc3339())
}
