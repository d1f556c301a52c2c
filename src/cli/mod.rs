//! CLI argument parsing for transcripts
//!
//! Uses clap for argument parsing.
//! Supports global flags: --root, --config, --format, --quiet, --verbose

pub mod args;
pub mod output;
pub mod paths;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{BuildArgs, StatsArgs};
pub use output::OutputFormat;

/// Transcripts - build the static data files for the conversation archive
#[derive(Parser, Debug)]
#[command(name = "transcripts")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base directory that relative paths resolve against
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Explicit config file (defaults to transcripts.toml in the root)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (e.g. debug, transcripts_core=trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build all artifacts from the raw export (default)
    Build(BuildArgs),

    /// Ingest and summarize the export without writing anything
    Stats(StatsArgs),
}
