//! otedump CLI — download and inspect the OTE price dataset.
//!
//! Commands:
//! - `dump`: download day-ahead prices and CNB rates into the CSV dataset, resuming
//!   after the last stored day
//! - `status`: report what the dataset holds and where the next `dump` would resume

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use otedump_core::data::{
    dump_all, CnbRateProvider, DatasetStore, DownloadProgress, DumpPlan, OtePriceProvider,
    SilentProgress, StdoutProgress, Transport,
};
use otedump_core::{Dataset, DumpConfig};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "otedump",
    about = "otedump: OTE day-ahead prices in EUR and CZK, resumable CSV dump"
)]
struct Cli {
    /// TOML config file. Flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset CSV path. Defaults to ote_prices.csv.
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download prices and exchange rates, continuing after the last stored day.
    Dump {
        /// Start date (YYYY-MM-DD) when no dataset exists yet. Defaults to 2002-01-01.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), exclusive. Defaults to tomorrow.
        #[arg(long)]
        end: Option<String>,

        /// Retries after a connection failure.
        #[arg(long)]
        retries: Option<u32>,

        /// No progress line on stdout.
        #[arg(long, default_value_t = false)]
        quiet: bool,
    },
    /// Report row count, date range and resume date of the dataset.
    Status,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => DumpConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DumpConfig::default(),
    };
    if let Some(output) = cli.output {
        config.output = output;
    }

    match cli.command {
        Commands::Dump {
            start,
            end,
            retries,
            quiet,
        } => {
            if let Some(start) = start.as_deref() {
                config.start_date = parse_date(start)?;
            }
            if let Some(end) = end.as_deref() {
                config.end_date = Some(parse_date(end)?);
            }
            if let Some(retries) = retries {
                config.http.max_retries = retries;
            }
            config.validate()?;
            run_dump(&config, quiet)
        }
        Commands::Status => run_status(&config),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn run_dump(config: &DumpConfig, quiet: bool) -> Result<()> {
    let transport = Arc::new(Transport::new(&config.http)?);
    let prices = OtePriceProvider::new(Arc::clone(&transport), config.price_url.clone());
    let rates = CnbRateProvider::new(transport, config.rate_url.clone());
    let store = DatasetStore::new(&config.output);
    let plan = DumpPlan::from_config(config, chrono::Local::now().date_naive());

    info!(
        "downloading into {} (start {}, end {})",
        store.path().display(),
        plan.start,
        plan.end
    );

    let progress: &dyn DownloadProgress = if quiet { &SilentProgress } else { &StdoutProgress };

    match dump_all(&prices, &rates, &store, &plan, progress) {
        Ok(summary) => {
            if summary.days_failed > 0 {
                eprintln!(
                    "{} of {} days could not be fetched and are missing from {}",
                    summary.days_failed,
                    summary.days_attempted,
                    config.output.display()
                );
            }
            Ok(())
        }
        Err(e) => Err(e).context("download stopped; the last checkpoint on disk is intact"),
    }
}

fn run_status(config: &DumpConfig) -> Result<()> {
    let store = DatasetStore::new(&config.output);
    let (resume, rows) = store.load()?;
    let dataset = Dataset::from_rows(rows);

    println!("Dataset:   {}", store.path().display());
    if dataset.is_empty() {
        println!("Rows:      0 (no data yet)");
    } else {
        let missing = dataset.rows().iter().filter(|r| r.is_missing()).count();
        println!("Rows:      {} ({missing} without price)", dataset.len());
        if let (Some(first), Some(last)) = (dataset.first_date(), dataset.last_date()) {
            println!("Range:     {first} .. {last}");
        }
    }
    println!("Next dump: {}", resume.unwrap_or(config.start_date));

    Ok(())
}
