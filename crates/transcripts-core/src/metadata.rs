//! The `metadata.json` rollup

use indexmap::IndexMap;
use serde::Serialize;

use crate::aggregate::{DatasetStats, ModelStats, TimestampRange};
use crate::family::ModelFamily;
use crate::record::{DIMENSION_NAMES, RATING_COUNT};

/// Dataset-wide summary consumed by the front end
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub total_conversations: u64,
    pub successful_conversations: u64,
    pub conversations_with_ratings: u64,
    pub conversations_with_introspection: u64,
    pub models: IndexMap<String, ModelStats>,
    pub model_families: IndexMap<String, ModelFamily>,
    pub providers: Vec<String>,
    pub apis: IndexMap<String, u64>,
    pub success_rate: f64,
    pub avg_response_length: u64,
    pub avg_introspection_length: u64,
    pub min_response_length: u64,
    pub max_response_length: u64,
    pub timestamps: TimestampRange,
    pub dimension_names: [&'static str; RATING_COUNT],
}

impl Metadata {
    pub fn new(stats: DatasetStats, model_families: IndexMap<String, ModelFamily>) -> Self {
        Metadata {
            total_conversations: stats.total_conversations,
            successful_conversations: stats.successful_conversations,
            conversations_with_ratings: stats.conversations_with_ratings,
            conversations_with_introspection: stats.conversations_with_introspection,
            models: stats.models,
            model_families,
            providers: stats.providers,
            apis: stats.apis,
            success_rate: stats.success_rate,
            avg_response_length: stats.avg_response_length,
            avg_introspection_length: stats.avg_introspection_length,
            min_response_length: stats.min_response_length,
            max_response_length: stats.max_response_length,
            timestamps: stats.timestamps,
            dimension_names: DIMENSION_NAMES,
        }
    }
}
