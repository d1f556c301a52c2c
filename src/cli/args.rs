use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Raw conversation export (JSON array)
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Directory the artifacts are written to
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Skip writing the annotated conversations.json
    #[arg(long)]
    pub no_conversations: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct StatsArgs {
    /// Raw conversation export (JSON array)
    #[arg(long, short)]
    pub input: Option<PathBuf>,
}
