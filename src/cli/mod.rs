use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::filter::MaturityPreset;

pub mod formatters;
pub mod runner;

#[derive(Parser, Debug)]
#[command(name = "cdbs")]
#[command(version, about = "Compare Brazilian bank CDB offers and simulate after-tax returns")]
#[command(
    long_about = "Load a daily snapshot of CDB offers, filter by bank, indexer, rating and maturity, find the best offer per indexer and simulate the net payout after regressive income tax."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Evaluate as of this date instead of today (YYYY-MM-DD)
    #[arg(long, global = true, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Path to a config file (default: <config dir>/cdbs/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the banks, indexers and ratings present in a snapshot
    Facets {
        /// Snapshot CSV (defaults to the configured snapshot)
        snapshot: Option<PathBuf>,
    },

    /// Show the filtered offers table
    Table {
        /// Snapshot CSV (defaults to the configured snapshot)
        snapshot: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show the best offer per indexer category
    Best {
        /// Snapshot CSV (defaults to the configured snapshot)
        snapshot: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show the average rate per indexer
    Averages {
        /// Snapshot CSV (defaults to the configured snapshot)
        snapshot: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Simulate the net return of the best offer in each category
    Simulate {
        /// Snapshot CSV (defaults to the configured snapshot)
        snapshot: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        simulation: SimulationArgs,
    },

    /// Show cards, averages, simulation and table together
    Dashboard {
        /// Snapshot CSV (defaults to the configured snapshot)
        snapshot: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        simulation: SimulationArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Keep only this bank (repeatable)
    #[arg(long = "bank", value_name = "BANK", conflicts_with = "exclude_banks")]
    pub banks: Vec<String>,

    /// Drop this bank, keep all others (repeatable)
    #[arg(long = "exclude-bank", value_name = "BANK")]
    pub exclude_banks: Vec<String>,

    /// Keep only this indexer label (repeatable)
    #[arg(long = "indexer", value_name = "INDEXER")]
    pub indexers: Vec<String>,

    /// Keep only this rating (repeatable)
    #[arg(long = "rating", value_name = "RATING")]
    pub ratings: Vec<String>,

    /// Maturity bucket: up-to-6m, 6m-1y, 1y-2y, over-2y
    #[arg(short, long, value_name = "PRESET")]
    pub maturity: Option<MaturityPreset>,

    /// Minimum days to maturity (inclusive)
    #[arg(long, conflicts_with = "maturity", allow_hyphen_values = true)]
    pub min_days: Option<i64>,

    /// Maximum days to maturity (inclusive)
    #[arg(long, conflicts_with = "maturity", allow_hyphen_values = true)]
    pub max_days: Option<i64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SimulationArgs {
    /// Amount to invest in R$ (default 5000, minimum 100)
    #[arg(short, long, allow_hyphen_values = true)]
    pub amount: Option<f64>,

    /// CDI annual rate in percent (default 10.65)
    #[arg(long, allow_hyphen_values = true)]
    pub cdi: Option<f64>,

    /// IPCA annual rate in percent (default 4.5)
    #[arg(long, allow_hyphen_values = true)]
    pub ipca: Option<f64>,
}
