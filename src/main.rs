//! Nil AI credential diagnostics binary entry point.
//!
//! All logs go to stderr; stdout is reserved for the report so that
//! `--json` output can be piped.
//!
//! Coverage is excluded because the main function drives the real network
//! and process exit codes; its pieces are tested in `cli` and `diagnostics`.

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use clap::Parser;
use tokio_util::sync::CancellationToken;

use nilai_diagnostics::cli::{render, Cli, EXIT_CONFIG_ERROR};
use nilai_diagnostics::config::{Config, DEFAULT_LOG_LEVEL};
use nilai_diagnostics::diagnostics::run_diagnostics_with_cancel;
use nilai_diagnostics::error::AppError;
use nilai_diagnostics::report::save_report;

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Loads .env before anything reads LOG_LEVEL
    let loaded = Config::load(cli.to_overrides());

    // Initialize logging to stderr only (stdout is for the report)
    let level = loaded
        .as_ref()
        .map_or(DEFAULT_LOG_LEVEL, |config| config.log_level.as_str());
    tracing_subscriber::fmt()
        .with_env_filter(
            cli.log_filter(level)
                .parse()
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(EXIT_CONFIG_ERROR);
        }
    };

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling diagnostic run");
            on_signal.cancel();
        }
    });

    let report = match run_diagnostics_with_cancel(&config, &cancel).await {
        Ok(report) => report,
        Err(AppError::Config(e)) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(EXIT_CONFIG_ERROR);
        }
        Err(e) => {
            tracing::error!("Diagnostic run failed: {e}");
            std::process::exit(1);
        }
    };

    match render(&report, cli.output_format()) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!("Failed to render report: {e}");
            std::process::exit(1);
        }
    }

    if cli.save {
        match save_report(&report, &cli.output_dir) {
            Ok(saved) => eprintln!(
                "Report saved to {} and {}",
                saved.json_path.display(),
                saved.text_path.display()
            ),
            Err(e) => {
                tracing::error!("Failed to save report: {e}");
                std::process::exit(1);
            }
        }
    }

    std::process::exit(report.exit_code());
}
