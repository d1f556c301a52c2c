//! Command dispatch logic for transcripts

use std::time::Instant;

use crate::cli::paths::resolve_root_path;
use crate::cli::{BuildArgs, Cli};
use tracing::debug;
use transcripts_core::error::Result;

mod command;

pub use command::{Command, CommandContext};

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let root = resolve_root_path(cli.root.clone());

    debug!(elapsed = ?start.elapsed(), root = %root.display(), "resolve_root");

    let ctx = CommandContext::new(cli, &root, start);

    match &cli.command {
        None => BuildArgs::default().execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    }
}
