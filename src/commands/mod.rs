//! CLI commands for transcripts

pub mod build;
pub mod dispatch;
pub mod stats;
