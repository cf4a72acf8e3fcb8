use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{error, info};

use lead_cleaner::app::{ClassifyUseCase, CleanUseCase, RunSummary, RunUseCase};
use lead_cleaner::config::AppConfig;
use lead_cleaner::infra::{CsvClassificationSink, CsvCleanedSink, CsvRunSink, CsvTableSource};
use lead_cleaner::{logging, observability};

#[derive(Parser)]
#[command(name = "lead_cleaner")]
#[command(about = "Contact directory cleaner and HVAC trade classifier")]
#[command(version)]
struct Cli {
    /// TOML configuration file (falls back to $LEAD_CLEANER_CONFIG, then defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the rolling JSON log
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    /// Print the run summary as JSON instead of text
    #[arg(long, global = true)]
    summary_json: bool,

    /// Write Prometheus text exposition of the run's counters to this file
    #[arg(long, global = true)]
    metrics_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deduplicate and normalize a contact table
    Clean {
        #[arg(long)]
        input: PathBuf,
        /// Cleaned CSV to write
        #[arg(long)]
        output: PathBuf,
    },
    /// Classify each contact as HVAC, Other, or No Description
    Classify {
        #[arg(long)]
        input: PathBuf,
        /// Directory receiving hvac.csv, other.csv and no_description.csv
        #[arg(long)]
        output_dir: PathBuf,
    },
    /// Clean, then classify the cleaned rows. All four output files are
    /// replaced together, only after both stages succeed.
    Run {
        #[arg(long)]
        input: PathBuf,
        /// Directory receiving cleaned.csv and the category files
        #[arg(long)]
        output_dir: PathBuf,
    },
}

fn run_command(command: &Commands, config: &AppConfig) -> anyhow::Result<RunSummary> {
    match command {
        Commands::Clean { input, output } => {
            info!("Cleaning {}", input.display());
            let use_case = CleanUseCase::new(config, Box::new(CsvCleanedSink::new(output)));
            let outcome = use_case
                .run(&CsvTableSource::new(input))
                .with_context(|| format!("Failed to clean {}", input.display()))?;
            Ok(RunSummary::from_clean(&outcome))
        }
        Commands::Classify { input, output_dir } => {
            info!("Classifying {}", input.display());
            ensure_dir(output_dir)?;
            let use_case =
                ClassifyUseCase::new(config, Box::new(CsvClassificationSink::new(output_dir)));
            let outcome = use_case
                .run(&CsvTableSource::new(input))
                .with_context(|| format!("Failed to classify {}", input.display()))?;
            Ok(RunSummary::from_classify(&outcome))
        }
        Commands::Run { input, output_dir } => {
            info!("Cleaning and classifying {}", input.display());
            ensure_dir(output_dir)?;
            let outcome = RunUseCase::new(config, Box::new(CsvRunSink::new(output_dir)))
                .run(&CsvTableSource::new(input))
                .with_context(|| format!("Failed to clean and classify {}", input.display()))?;
            Ok(RunSummary::from_run(&outcome.cleaned, &outcome.classified))
        }
    }
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}

fn write_metrics(handle: &PrometheusHandle, path: &Path) -> anyhow::Result<()> {
    fs::write(path, handle.render())
        .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
    info!("Metrics written to {}", path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let _guard = logging::init_logging(&cli.log_dir).context("Failed to initialize logging")?;

    let metrics = match &cli.metrics_file {
        Some(_) => Some(observability::init()?),
        None => None,
    };

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let started = Instant::now();
    let summary = match run_command(&cli.command, &config) {
        Ok(summary) => summary.finish(started.elapsed(), Utc::now()),
        Err(e) => {
            error!("Run failed: {:#}", e);
            return Err(e);
        }
    };

    if cli.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary);
    }

    if let (Some(handle), Some(path)) = (&metrics, &cli.metrics_file) {
        write_metrics(handle, path)?;
    }

    Ok(())
}
