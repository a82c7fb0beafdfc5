//! CLI for the harvest pipeline.

mod args;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use harvest_core::config;
use std::path::PathBuf;

use commands::{run_harvest, run_reset, run_status, RunOverrides};

/// Top-level CLI for the harvest pipeline.
#[derive(Debug, Parser)]
#[command(name = "harvest")]
#[command(about = "Resumable harvester for the UC annual wage search API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch every (location, year) task not yet completed.
    Run {
        /// Number of concurrent workers (default from config, 5).
        #[arg(long, value_name = "N")]
        workers: Option<usize>,
        /// Delay between requests in seconds, per worker (default from config, 1.0).
        #[arg(long, value_name = "SECS")]
        delay: Option<f64>,
        /// Output directory for snapshots and the progress ledger.
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
        /// Comma-separated locations to harvest instead of the configured list.
        #[arg(long, value_name = "LIST")]
        locations: Option<String>,
        /// Comma-separated years to harvest instead of the configured range.
        #[arg(long, value_name = "LIST")]
        years: Option<String>,
        /// Discard recorded progress before running (snapshots on disk are still honored).
        #[arg(long)]
        reset: bool,
    },

    /// Show ledger progress without fetching anything.
    Status {
        /// Output directory holding the progress ledger.
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },

    /// Delete the progress ledger.
    Reset {
        /// Output directory holding the progress ledger.
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                workers,
                delay,
                data_dir,
                locations,
                years,
                reset,
            } => {
                let overrides = RunOverrides {
                    workers,
                    delay,
                    data_dir,
                    locations,
                    years,
                };
                run_harvest(&cfg, overrides, reset).await?;
            }
            CliCommand::Status { data_dir } => {
                run_status(&data_dir.unwrap_or_else(|| cfg.data_dir.clone()))?
            }
            CliCommand::Reset { data_dir } => {
                run_reset(&data_dir.unwrap_or_else(|| cfg.data_dir.clone()))?
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
