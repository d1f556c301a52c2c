//! Search index construction
//!
//! The listing view loads one small entry per conversation instead of the full
//! transcripts. Text fields are cut to a fixed number of characters.

use serde::Serialize;

use crate::config::IndexConfig;
use crate::record::{ConversationRecord, RATING_COUNT};

/// Compact projection of one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchIndexEntry {
    pub id: usize,
    pub model: String,
    pub api: String,
    pub prompt: String,
    pub response: String,
    pub introspection: String,
    pub timestamp: Option<String>,
    pub success: bool,
    pub has_ratings: bool,
    pub ratings: Option<[i64; RATING_COUNT]>,
}

/// First `max_chars` characters of `text`.
///
/// Counts Unicode scalar values, so a multi-byte character is never split.
/// No ellipsis is added.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

impl SearchIndexEntry {
    pub fn from_record(id: usize, record: &ConversationRecord, limits: &IndexConfig) -> Self {
        let cut = |text: &Option<String>, max| {
            truncate_chars(text.as_deref().unwrap_or(""), max).to_string()
        };

        SearchIndexEntry {
            id,
            model: record.model.clone(),
            api: record.api.clone(),
            prompt: cut(&record.prompt, limits.prompt_max_chars),
            response: cut(&record.response, limits.response_max_chars),
            introspection: cut(&record.introspection, limits.introspection_max_chars),
            timestamp: record.timestamp.clone(),
            success: record.success,
            has_ratings: record.is_rated(),
            ratings: record.ratings,
        }
    }
}

/// One entry per record, in input order, with 0-based ids
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn build_index(records: &[ConversationRecord], limits: &IndexConfig) -> Vec<SearchIndexEntry> {
    records
        .iter()
        .enumerate()
        .map(|(id, record)| SearchIndexEntry::from_record(id, record, limits))
        .collect()
}
