//! alv-parse-worker - parses KoLmafia session logs into JSON summaries.
//!
//! Usage: alv-parse-worker [--output-dir DIR] [--settings FILE] <LOG>...
//!
//! Every log gets `<stem>.json` in the output directory. A JSON report of
//! parsed and failed logs is printed to stdout; the exit code is 1 when any
//! log failed.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use alv_core::batch::ensure_output_dir;
use alv_core::{ParserSettings, default_settings_path, load_settings, parse_logs};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Parse KoLmafia ascension logs")]
struct Cli {
    /// Session log files to parse.
    #[arg(required = true)]
    logs: Vec<PathBuf>,

    /// Directory for the JSON summaries (and block dumps in debug mode).
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Settings file; defaults to the per-user config location.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Dump every block to `<stem>-BlockDump.txt`, overriding the settings file.
    #[arg(long)]
    debug: bool,
}

#[derive(Serialize)]
struct WorkerOutput {
    parsed: Vec<ParsedEntry>,
    failed: Vec<FailedEntry>,
    elapsed_ms: u128,
}

#[derive(Serialize)]
struct ParsedEntry {
    log_name: String,
    output: PathBuf,
    last_turn: u32,
}

#[derive(Serialize)]
struct FailedEntry {
    log_name: String,
    last_turn: u32,
    error: String,
}

/// Initialize logging, writing to ALV_LOG_PATH if set, otherwise stderr.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var("ALV_LOG_PATH")
        && let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_ansi(false)
            .with_writer(file)
            .init();
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_settings(cli: &Cli) -> ParserSettings {
    let path = cli.settings.clone().or_else(default_settings_path);
    let mut settings = match path {
        Some(path) => load_settings(&path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Settings unreadable, using defaults");
            ParserSettings::default()
        }),
        None => ParserSettings::default(),
    };
    settings.debug |= cli.debug;
    settings
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    let settings = resolve_settings(&cli);

    if let Err(e) = ensure_output_dir(&cli.output_dir) {
        tracing::error!(error = %e, "Failed to create output dir");
        return ExitCode::FAILURE;
    }

    let timer = Instant::now();
    let report = parse_logs(&cli.logs, settings, &cli.output_dir);

    let output = WorkerOutput {
        parsed: report
            .parsed
            .iter()
            .map(|log| ParsedEntry {
                log_name: log.log_name.clone(),
                output: log.output.clone(),
                last_turn: log.last_turn,
            })
            .collect(),
        failed: report
            .failures
            .iter()
            .map(|failure| FailedEntry {
                log_name: failure.log_name.clone(),
                last_turn: failure.last_turn,
                error: failure.source.to_string(),
            })
            .collect(),
        elapsed_ms: timer.elapsed().as_millis(),
    };

    match serde_json::to_string(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "Failed to serialize report"),
    }

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
