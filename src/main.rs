//! Capital Stats - Regional Capital Formation Spreadsheet Analysis
//!
//! Reads a spreadsheet of regional capital formation figures, finds the
//! 2005-2010 year columns and prints the average for each year along with
//! the overall average across years.

mod analysis;
mod cli;
mod data;
mod report;
mod stats;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use report::Reporter;
use std::io;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    init_logging();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr so the report on stdout stays clean.
fn init_logging() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.config()?;

    let mut reporter = Reporter::new(io::stdout().lock());
    let outcome = analysis::run(&config, &mut reporter).context("failed to write report")?;
    info!(
        columns = outcome.averages().len(),
        overall = ?outcome.overall(),
        "analysis finished"
    );

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
