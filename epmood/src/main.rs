//! epmood - Episode mood resolver
//!
//! Takes one episode ID, prints one JSON line on stdout:
//! - success: `{"chillFactor":<f>,"happinessFactor":<f>}`, exit 0
//! - failure: `{"error":"<message>"}`, exit 1
//!
//! Logs go to stderr, filtered by `RUST_LOG`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;
use epmood::report::Report;
use epmood::{Deadline, MoodPipeline, MoodSummary, PipelineResult};
use epmood_common::config::resolve_config_path;
use epmood_common::ServiceConfig;
use tracing::{debug, info};

/// Command-line arguments for epmood
#[derive(Parser, Debug)]
#[command(name = "epmood")]
#[command(about = "Compute the happiness and chill factor of a broadcast episode")]
#[command(version)]
struct Args {
    /// Episode identifier
    episode_id: String,

    /// Configuration file (falls back to EPMOOD_CONFIG, then ./config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// End-to-end deadline in seconds, overriding the configuration
    #[arg(long, env = "EPMOOD_TIMEOUT_SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize logging: {e:#}");
    }

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => return usage_failure(e),
    };

    let result = run(&args).await;
    emit(Report::from_result(&result))
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "epmood=info".into()),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))
}

async fn run(args: &Args) -> PipelineResult<MoodSummary> {
    let config_path = resolve_config_path(args.config.as_deref());
    let config = ServiceConfig::load(&config_path)?;

    let timeout = args
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(config.timeout);
    info!(timeout = ?timeout, "Pipeline deadline");

    let pipeline = MoodPipeline::from_config(&config)?;
    pipeline
        .run(&args.episode_id, Deadline::after(timeout))
        .await
}

fn usage_failure(e: clap::Error) -> ExitCode {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = e.print();
            ExitCode::SUCCESS
        }
        ErrorKind::MissingRequiredArgument | ErrorKind::UnknownArgument => {
            debug!(error = %e, "Argument error");
            emit(Report::usage())
        }
        _ => emit(Report::error(e.to_string().lines().next().unwrap_or_default())),
    }
}

fn emit(report: Report) -> ExitCode {
    println!("{}", report.line);
    ExitCode::from(report.exit_code)
}
