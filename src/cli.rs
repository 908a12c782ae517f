use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fmprep_calendar::Date;

/// fmprep reanalysis preprocessing pipeline.
#[derive(Parser)]
#[command(
    name = "fmprep",
    version,
    about = "Reanalysis preprocessing for weather foundation models"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Resample raw source files into the cache and persist statistics.
    Preprocess(PreprocessArgs),
    /// Assemble a model-ready feature tensor from cached units.
    Batch(BatchArgs),
    /// Recompute normalization statistics from the cached units.
    Stats(StatsArgs),
}

/// Arguments for the `preprocess` subcommand.
#[derive(clap::Args)]
pub struct PreprocessArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "fmprep.toml")]
    pub config: PathBuf,

    /// Recompute units whose cache file already exists.
    #[arg(long)]
    pub reprocess: bool,

    /// Override worker thread count from config.
    #[arg(short, long)]
    pub threads: Option<usize>,
}

/// Arguments for the `batch` subcommand.
#[derive(clap::Args)]
pub struct BatchArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "fmprep.toml")]
    pub config: PathBuf,

    /// First day of the batch (YYYY-MM-DD).
    #[arg(long)]
    pub start: Date,

    /// Last day of the batch, inclusive (defaults to `start`).
    #[arg(long)]
    pub end: Option<Date>,

    /// Skip the year and day progress features.
    #[arg(long)]
    pub no_derived: bool,

    /// Write the feature tensor to this NetCDF file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `stats` subcommand.
#[derive(clap::Args)]
pub struct StatsArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "fmprep.toml")]
    pub config: PathBuf,
}
