use clap::{Parser, Subcommand};
use colored::Colorize;
use hyperion_bench::bench::{
    default_queries, format_query_report, format_result_line, JsonReporter, Reporter,
    TextReporter,
};
use hyperion_bench::config::CONFIG_FILE_NAME;
use hyperion_bench::{
    BenchConfig, BenchmarkDriver, Dataset, Filter, HyperionClientBuilder, Operation, QueryDriver,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "hyperion-bench")]
#[command(about = "Benchmark and query client for HyperionDB", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Measure average latency per operation and batch size
    Bench {
        /// TOML configuration file (defaults to ./hyperion-bench.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Server host
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Server port
        #[arg(short = 'P', long)]
        port: Option<u16>,

        /// Trials averaged into each measurement
        #[arg(short, long)]
        trials: Option<usize>,

        /// Batch size to measure (repeatable)
        #[arg(short, long = "batch-size")]
        batch_sizes: Vec<usize>,

        /// Operation to measure: insert, query, update, delete (repeatable)
        #[arg(short, long = "operation")]
        operations: Vec<Operation>,

        /// Number of generated article records
        #[arg(long)]
        dataset_size: Option<usize>,

        /// Load records from a JSON file instead of generating them
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Per-request timeout in milliseconds (0 waits forever)
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Also write results as JSON
        #[arg(long)]
        json_out: Option<PathBuf>,
    },

    /// Run filtered queries and report result counts and latency
    Query {
        /// Server host
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Server port
        #[arg(short = 'P', long, default_value_t = 8080)]
        port: u16,

        /// Per-request timeout in milliseconds (0 waits forever)
        #[arg(long, default_value_t = 30_000)]
        timeout_ms: u64,

        /// Queries as "field operator value"; runs the built-in set if omitted
        queries: Vec<Filter>,
    },

    /// Write a generated dataset to a JSON file
    Generate {
        /// Number of records
        #[arg(short = 'n', long, default_value_t = 100_000)]
        count: usize,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Seed for reproducible product data
        #[arg(long)]
        seed: Option<u64>,

        /// Generate article records instead of products
        #[arg(long)]
        articles: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hyperion_bench=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.command {
        Commands::Bench {
            config,
            host,
            port,
            trials,
            batch_sizes,
            operations,
            dataset_size,
            dataset,
            timeout_ms,
            json_out,
        } => {
            let mut config = match config {
                Some(path) => BenchConfig::load(&path)?,
                None if Path::new(CONFIG_FILE_NAME).exists() => {
                    BenchConfig::load(Path::new(CONFIG_FILE_NAME))?
                }
                None => BenchConfig::default(),
            };
            config.apply_env_overrides();

            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(trials) = trials {
                config.trials_per_measurement = trials;
            }
            if !batch_sizes.is_empty() {
                config.batch_sizes = batch_sizes;
            }
            if !operations.is_empty() {
                config.operations = operations;
            }
            if let Some(size) = dataset_size {
                config.dataset_size = size;
            }
            if let Some(ms) = timeout_ms {
                config.timeout_ms = ms;
            }

            let dataset = match dataset {
                Some(path) => {
                    let dataset = Dataset::from_json_file(&path)?;
                    tracing::info!("Loaded {} records from {}", dataset.len(), path.display());
                    config.dataset_size = dataset.len();
                    dataset
                }
                None => Dataset::articles(config.dataset_size),
            };

            run_bench(&config, &dataset, json_out).await?;
        }

        Commands::Query {
            host,
            port,
            timeout_ms,
            queries,
        } => {
            let builder = HyperionClientBuilder::new(&format!("{}:{}", host, port));
            let builder = if timeout_ms == 0 {
                builder.no_timeout()
            } else {
                builder.timeout_ms(timeout_ms)
            };
            let driver = QueryDriver::new(builder.build()?);

            let queries = if queries.is_empty() {
                default_queries()
            } else {
                queries
            };

            for report in driver.run_all(&queries).await {
                match &report.result {
                    Ok(_) => println!("{}\n", format_query_report(&report)),
                    Err(_) => println!(
                        "{} {}\n",
                        "Error:".red().bold(),
                        format_query_report(&report)
                    ),
                }
            }
        }

        Commands::Generate {
            count,
            output,
            seed,
            articles,
        } => {
            let dataset = if articles {
                Dataset::articles(count)
            } else {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                Dataset::products(count, &mut rng)
            };
            dataset.write_json_file(&output)?;
            println!(
                "{} Wrote {} records to {}",
                "✓".green(),
                dataset.len(),
                output.display()
            );
        }
    }

    Ok(())
}

async fn run_bench(
    config: &BenchConfig,
    dataset: &Dataset,
    json_out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let driver = BenchmarkDriver::from_config(config)?;

    println!("{}", "HyperionDB Benchmark".white().bold());
    println!(
        "  server {} | {} trials | batch sizes {:?} | {} records",
        config.addr(),
        driver.trials(),
        config.batch_sizes,
        dataset.len()
    );
    println!("{}", "-".repeat(60));

    let results = driver
        .run_suite(dataset, &config.batch_sizes, &config.operations, |entry| {
            let line = format_result_line(entry);
            if entry.measurement.is_complete() {
                println!("{}", line);
            } else {
                println!("{}", line.yellow());
            }
        })
        .await?;

    println!();
    TextReporter::new(std::io::stdout()).report(&results)?;

    if let Some(path) = json_out {
        JsonReporter::new(path).report(&results)?;
    }
    Ok(())
}
