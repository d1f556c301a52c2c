//! `transcripts stats` command - summarize the export without writing

use crate::cli::paths::config_path_string;
use crate::cli::{OutputFormat, StatsArgs};
use crate::commands::dispatch::{Command, CommandContext};
use transcripts_core::error::Result;
use transcripts_core::pipeline::{self, Summary};

impl Command for StatsArgs {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let mut config = ctx.load_config()?;
        if let Some(input) = &self.input {
            config.paths.input = config_path_string(input);
        }

        let summary = pipeline::analyze(ctx.root, &config)?;
        tracing::debug!(elapsed = ?ctx.start.elapsed(), "stats");

        match ctx.cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            OutputFormat::Human => {
                if !ctx.cli.quiet {
                    print_summary_human(&summary, ctx.cli.verbose);
                }
            }
        }
        Ok(())
    }
}

/// Print the run statistics for a terminal
pub fn print_summary_human(summary: &Summary, verbose: bool) {
    println!("Processed {} conversations", summary.total_conversations);
    println!(
        "  {} successful ({:.1}%)",
        summary.successful_conversations, summary.success_rate
    );
    println!(
        "  {} with phenomenology ratings",
        summary.conversations_with_ratings
    );
    println!(
        "  {} with introspective reports",
        summary.conversations_with_introspection
    );
    println!(
        "  {} unique models in {} families",
        summary.unique_models, summary.model_families
    );
    println!("  Avg response length: {} chars", summary.avg_response_length);

    if summary.anomalies > 0 {
        println!("  {} record anomalies tolerated", summary.anomalies);
    }
    if verbose {
        println!("  Input: {}", summary.input.display());
        if let Some(dir) = &summary.output_dir {
            println!("  Output: {}", dir.display());
        }
    }
}
