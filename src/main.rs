//! CLI entry point for the schedule cleaner.
//!
//! Provides subcommands for running the full cleaning pipeline over a
//! historical trip table and for reporting its residual missing data.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use schedule_cleaner::{
    config::PipelineConfig,
    output::{print_json, write_outputs},
    parser::load_trips,
    pipeline::process_historical_data,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "schedule_cleaner")]
#[command(about = "Clean and enrich historical railway schedule data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand that runs the pipeline.
#[derive(clap::Args)]
struct PipelineArgs {
    /// Historical trip table (CSV with an embedded schedule per row)
    #[arg(value_name = "FILE")]
    input: String,

    /// JSON file with pipeline thresholds
    #[arg(short, long)]
    config: Option<String>,

    /// Only read the first N trips
    #[arg(short, long)]
    limit: Option<usize>,

    /// Minutes beyond which a time difference is treated as crossing midnight
    #[arg(long)]
    rollover_threshold: Option<f64>,

    /// Maximum percentage of missing stop cells a trip may have
    #[arg(long)]
    missing_threshold: Option<f64>,
}

impl PipelineArgs {
    fn load_config(&self) -> Result<PipelineConfig> {
        let config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        Ok(config.with_overrides(self.rollover_threshold, self.missing_threshold))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write every output table
    Process {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Directory to write CSV outputs into
        #[arg(short, long, default_value = "output")]
        output_dir: String,

        /// Gzip compress the CSV outputs
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Run the pipeline and report residual missing data without writing tables
    Diagnose {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/schedule_cleaner.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("schedule_cleaner.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            pipeline,
            output_dir,
            gzip,
        } => {
            let config = pipeline.load_config()?;
            info!(?config, input = %pipeline.input, "Adding schedule detail");
            let trips = load_trips(&pipeline.input, pipeline.limit)?;

            let output = process_historical_data(trips, &config)
                .with_context(|| format!("Failed to process '{}'", pipeline.input))?;

            write_outputs(Path::new(&output_dir), &output, gzip)?;
            print_json(&output.summary)?;
        }
        Commands::Diagnose { pipeline } => {
            let config = pipeline.load_config()?;
            let trips = load_trips(&pipeline.input, pipeline.limit)?;

            let output = process_historical_data(trips, &config)
                .with_context(|| format!("Failed to process '{}'", pipeline.input))?;

            for record in output.reconciliation.records() {
                debug!(
                    trip_index = record.trip_index,
                    stop_index = record.stop_index,
                    origin = %record.origin,
                    destination = %record.destination,
                    "Missing actual arrival"
                );
            }
            print_json(&output.summary)?;
        }
    }

    Ok(())
}
