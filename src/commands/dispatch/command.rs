//! Command trait and context for dispatching commands

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::{Cli, Commands};
use transcripts_core::config::{self, PipelineConfig};
use transcripts_core::error::Result;

/// Load the pipeline config named by `--config`, or discover one in the root
pub fn load_config(cli: &Cli, root: &Path) -> Result<PipelineConfig> {
    match &cli.config {
        Some(path) => {
            let resolved = config::resolve(root, &path.to_string_lossy());
            PipelineConfig::load(&resolved)
        }
        None => PipelineConfig::discover(root),
    }
}

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub root: &'a PathBuf,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, root: &'a PathBuf, start: Instant) -> Self {
        Self { cli, root, start }
    }

    pub fn load_config(&self) -> Result<PipelineConfig> {
        load_config(self.cli, self.root)
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Build(args) => args.execute(ctx),
            Commands::Stats(args) => args.execute(ctx),
        }
    }
}
