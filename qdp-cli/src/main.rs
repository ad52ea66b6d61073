//! QDP CLI: validate a daily price CSV from the raw-data directory.
//!
//! Commands:
//! - `validate`: run the validation gate over one file and print a summary

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use qdp_core::{Validated, Validator, ValidatorConfig};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "qdp",
    about = "QDP CLI: validation gate for historical daily price files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one CSV file and print a summary of the clean table.
    Validate {
        /// File name under the data directory, including its extension (e.g., SPY.csv).
        name: String,

        /// Directory holding raw CSV files. Overrides the config file. Defaults to data/raw.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the summary as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// What a successful validation reports back to the user.
#[derive(Debug, Serialize)]
struct Summary {
    file: String,
    rows: usize,
    first_date: Option<NaiveDate>,
    last_date: Option<NaiveDate>,
    columns: Vec<String>,
    warnings: Vec<String>,
    fingerprint: String,
}

impl Summary {
    fn from_validated(validated: &Validated) -> Result<Self> {
        let table = &validated.table;
        Ok(Self {
            file: table.source().to_string(),
            rows: table.height(),
            first_date: table.first_date(),
            last_date: table.last_date(),
            columns: table.column_names(),
            warnings: validated.warnings.iter().map(|w| w.to_string()).collect(),
            fingerprint: table
                .fingerprint()
                .context("failed to fingerprint validated table")?,
        })
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            name,
            data_dir,
            config,
            json,
        } => run_validate(&name, data_dir, config, json),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(data_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<ValidatorConfig> {
    let config = match config_path {
        Some(path) => ValidatorConfig::from_file(&path)?,
        None => ValidatorConfig::default(),
    };
    let config = match data_dir {
        Some(dir) => config.with_data_dir(dir),
        None => config,
    };
    debug!(?config, "loaded validator config");
    Ok(config)
}

fn run_validate(
    name: &str,
    data_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = load_config(data_dir, config_path)?;
    let validator = Validator::new(config);

    let validated = validator
        .validate(name)
        .with_context(|| format!("validation failed for '{name}'"))?;
    let summary = Summary::from_validated(&validated)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &Summary) {
    let fmt_date = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".into());

    println!();
    println!("=== Validated ===");
    println!("File:        {}", summary.file);
    println!("Rows:        {}", summary.rows);
    println!(
        "Period:      {} to {}",
        fmt_date(summary.first_date),
        fmt_date(summary.last_date)
    );
    println!("Columns:     {}", summary.columns.join(", "));
    println!("Fingerprint: {}", summary.fingerprint);
    for warn in &summary.warnings {
        println!("WARNING: {warn}");
    }
    println!();
}
