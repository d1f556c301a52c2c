//! Transcripts Core Library
//!
//! Data pipeline behind the transcripts archive: reads the raw conversation
//! export and derives the static JSON artifacts served to the browser.

pub mod aggregate;
pub mod config;
pub mod emit;
pub mod error;
pub mod family;
pub mod ingest;
pub mod logging;
pub mod metadata;
pub mod pipeline;
pub mod record;
pub mod search;
