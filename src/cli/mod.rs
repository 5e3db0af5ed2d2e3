//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

pub mod commands;
pub mod output;

pub use commands::Commands;

/// Track attendance-earned slip days across gradebook exports.
#[derive(Parser, Debug)]
#[command(name = "slipday", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit machine-readable JSON on stdout
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Config file (replaces global and project config)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Gradebook export to load instead of the newest one in the import directory
    #[arg(long, global = true, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Directory holding the cached gradebook export
    #[arg(long, global = true, value_name = "DIR")]
    pub import_dir: Option<PathBuf>,

    /// Save file (JSON)
    #[arg(long, global = true, value_name = "PATH")]
    pub save: Option<PathBuf>,
}
