use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use colscan::runner::{RunOptions, RunSummary, run};
use colscan::{DEFAULT_DATA_PATH, Error as ColscanError, ScanMode, ScanOutcome, StoreConfig};

fn parse_block_size(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|err| format!("invalid block size '{value}': {err}"))?;
    if parsed == 0 {
        return Err("block size must be greater than zero".into());
    }
    Ok(parsed)
}

#[derive(Parser)]
#[command(
    name = "colscan",
    about = "Resale price statistics over a column store with partition and zone-map pruning"
)]
struct Cli {
    /// Identifier whose trailing digits select the town, month and year.
    #[arg(value_name = "IDENTIFIER")]
    identifier: String,
    /// Filter once for all statistics (true) or once per statistic (false).
    #[arg(long = "shared-scan", value_name = "BOOL", action = ArgAction::Set, default_value_t = true)]
    shared_scan: bool,
    /// Partition the table by this column at load.
    #[arg(long = "partition-by", value_name = "COLUMN")]
    partition_by: Option<String>,
    /// Keep zone bounds for this column's blocks.
    #[arg(long = "zone-map-by", value_name = "COLUMN")]
    zone_map_by: Option<String>,
    /// Source CSV file.
    #[arg(long = "data", value_name = "PATH", default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,
    /// Directory the result CSV is written to.
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,
    /// Block capacity in bytes.
    #[arg(long = "block-size", value_name = "BYTES", value_parser = parse_block_size)]
    block_size: Option<usize>,
}

impl Cli {
    fn into_options(self) -> RunOptions {
        let mut store = StoreConfig::default();
        if let Some(column) = self.partition_by {
            store = store.with_partition_column(column);
        }
        if let Some(column) = self.zone_map_by {
            store = store.with_zone_map_column(column);
        }
        if let Some(bytes) = self.block_size {
            store = store.with_block_size(bytes);
        }

        let mut options = RunOptions::new(self.identifier);
        options.data_path = self.data;
        options.output_dir = self.output_dir;
        options.mode = ScanMode::from_shared_flag(self.shared_scan);
        options.store = store;
        options
    }
}

fn main() {
    // Initialize tracing subscriber to respect RUST_LOG environment variable
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run_cli() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run_cli() -> Result<(), ColscanError> {
    let options = Cli::parse().into_options();
    print_configuration(&options);
    let summary = run(&options)?;
    print_summary(&summary);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_configuration(options: &RunOptions) {
    println!("Data file       : {}", options.data_path.display());
    println!("Scan mode       : {}", options.mode);
    println!(
        "Partitioned by  : {}",
        options.store.partition_column.as_deref().unwrap_or("(none)")
    );
    println!(
        "Zone map on     : {}",
        options.store.zone_map_column.as_deref().unwrap_or("(none)")
    );
    println!("Block size      : {} bytes", options.store.block_size);
}

#[allow(clippy::print_stdout)]
fn print_summary(summary: &RunSummary) {
    println!();
    println!("Town            : {}", summary.params.town);
    println!(
        "Months          : {} to {}",
        summary.params.start_year_month, summary.params.end_year_month
    );
    println!("Rows loaded     : {}", summary.rows_loaded);
    println!("Filter order    : {}", summary.plan);
    println!();
    match &summary.outcome {
        ScanOutcome::Computed(values) => {
            for value in values {
                println!("{:<32}{}", value.category.label(), value.formatted());
            }
        }
        ScanOutcome::NoResult => println!("No result"),
    }
    println!();
    println!("Report written  : {}", summary.report_path.display());
    println!(
        "Total time      : {:.3} ms",
        summary.elapsed.as_secs_f64() * 1000.0
    );
}
