use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Analog ensemble generator.
#[derive(Parser)]
#[command(
    name = "anen",
    version,
    about = "Analog ensemble generation for gridded station forecasts"
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
    /// Build the configured synthetic dataset and generate analog ensembles.
    Run(RunArgs),
}

/// Arguments for the `run` subcommand.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "anen.toml")]
    pub config: PathBuf,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Override the number of station shards from config.
    #[arg(long)]
    pub shards: Option<usize>,
}
