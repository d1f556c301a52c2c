//! `transcripts build` command - run the pipeline and write the artifacts
//!
//! Reads the raw export, derives metadata, search index and model families,
//! and writes them (plus the annotated conversations and auxiliary CSVs) to
//! the output directory.

use crate::cli::paths::config_path_string;
use crate::cli::{BuildArgs, Cli, OutputFormat};
use crate::commands::dispatch::{Command, CommandContext};
use crate::commands::stats::print_summary_human;
use transcripts_core::config::PipelineConfig;
use transcripts_core::error::Result;
use transcripts_core::pipeline::{self, Summary};

impl BuildArgs {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(input) = &self.input {
            config.paths.input = config_path_string(input);
        }
        if let Some(output) = &self.output {
            config.paths.output_dir = config_path_string(output);
        }
        if self.no_conversations {
            config.paths.write_conversations = false;
        }
    }
}

impl Command for BuildArgs {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let mut config = ctx.load_config()?;
        self.apply(&mut config);

        let summary = pipeline::run(ctx.root, &config)?;
        tracing::debug!(elapsed = ?ctx.start.elapsed(), "build");

        output(ctx.cli, &summary)
    }
}

fn output(cli: &Cli, summary: &Summary) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        OutputFormat::Human => {
            if cli.quiet {
                return Ok(());
            }
            if let Some(report) = &summary.emitted {
                for name in &report.written {
                    println!("Generated {}", name);
                }
                for skipped in &report.skipped {
                    println!("Skipped missing {}", skipped.display());
                }
                println!();
            }
            print_summary_human(summary, cli.verbose);
        }
    }
    Ok(())
}
