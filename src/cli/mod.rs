//! Command-line configuration. Every option can also come from the environment so
//! the harness drops into CI pipelines unchanged.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::collections::solvency::{DEFAULT_BASE_URL, PlanOptions};
use crate::http::client::Timeouts;
use crate::storage::DEFAULT_RESULTS_FILE;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Probe every endpoint in order and print a readiness verdict
    Run(RunArgs),
    /// List previously recorded runs
    History(HistoryArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Base URL of the service under test
    #[arg(long, env = "READYCHECK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Where to write the detailed JSON results
    #[arg(long, short, env = "READYCHECK_OUTPUT", default_value = DEFAULT_RESULTS_FILE)]
    pub output: PathBuf,

    /// Also record the run in this SQLite history database
    #[arg(long, env = "READYCHECK_HISTORY_DB")]
    pub history_db: Option<PathBuf>,

    /// Wait ceiling for GET and PUT requests, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Wait ceiling for POST requests, which trigger long-running work, in seconds
    #[arg(long, default_value_t = 60)]
    pub long_timeout_secs: u64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Run the full workflow including proof generation
    #[arg(long, default_value = "false")]
    pub with_proof: bool,

    /// Only print the final summary, not a line per probe
    #[arg(long, short, default_value = "false")]
    pub quiet: bool,
}

impl RunArgs {
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            standard: Duration::from_secs(self.timeout_secs.max(1)),
            long_running: Duration::from_secs(self.long_timeout_secs.max(1)),
        }
    }

    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            workflow_with_proof: self.with_proof,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// SQLite history database written by `run --history-db`
    #[arg(long, env = "READYCHECK_HISTORY_DB")]
    pub history_db: PathBuf,

    /// Number of runs to show
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Print the stored JSON results of one run instead of the list
    #[arg(long, value_name = "RUN_ID")]
    pub show: Option<String>,
}

/// Output format for the final report on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
