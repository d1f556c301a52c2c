//! End-to-end dataset build: ingest, aggregate, categorize, index, emit

use std::path::{Path, PathBuf};
use std::time::Instant;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::aggregate::aggregate;
use crate::config::{self, PipelineConfig};
use crate::emit::{
    self, Artifact, EmitReport, Passthrough, CONVERSATIONS_FILE, METADATA_FILE,
    MODEL_FAMILIES_FILE, SEARCH_INDEX_FILE,
};
use crate::error::Result;
use crate::family::{FamilyRules, ModelFamily};
use crate::ingest::{self, Dataset};
use crate::metadata::Metadata;
use crate::search::{build_index, SearchIndexEntry};
use crate::trace_time;

/// Everything derived from one dataset
#[derive(Debug, Clone)]
pub struct Derived {
    pub metadata: Metadata,
    pub search_index: Vec<SearchIndexEntry>,
    pub families: IndexMap<String, ModelFamily>,
}

/// Run summary reported by the CLI
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub input: PathBuf,
    pub total_conversations: u64,
    pub successful_conversations: u64,
    pub conversations_with_ratings: u64,
    pub conversations_with_introspection: u64,
    pub unique_models: usize,
    pub model_families: usize,
    pub success_rate: f64,
    pub avg_response_length: u64,
    pub anomalies: usize,
    /// Present only when artifacts were written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emitted: Option<EmitReport>,
}

/// Derive metadata, search index and families from a loaded dataset
pub fn derive(dataset: &Dataset, config: &PipelineConfig) -> Result<Derived> {
    let start = Instant::now();
    let rules = FamilyRules::from_config(&config.families)?;

    let stats = aggregate(&dataset.records);
    trace_time!(start, "aggregate", models = stats.models.len());

    let families = rules.categorize(
        stats
            .models
            .iter()
            .map(|(model, s)| (model.as_str(), s.count)),
    );
    trace_time!(start, "categorize", families = families.len());

    let search_index = build_index(&dataset.records, &config.index);
    trace_time!(start, "index", entries = search_index.len());

    Ok(Derived {
        metadata: Metadata::new(stats, families.clone()),
        search_index,
        families,
    })
}

/// Serialize the derived data (and optionally the annotated conversations)
pub fn artifacts(
    dataset: &Dataset,
    derived: &Derived,
    config: &PipelineConfig,
) -> Result<Vec<Artifact>> {
    let mut artifacts = vec![
        Artifact::json(METADATA_FILE, &derived.metadata)?,
        Artifact::json(SEARCH_INDEX_FILE, &derived.search_index)?,
        Artifact::json(MODEL_FAMILIES_FILE, &derived.families)?,
    ];

    if config.paths.write_conversations {
        let conversations: Vec<Value> = dataset
            .records
            .iter()
            .enumerate()
            .map(|(id, record)| record.annotated(id))
            .collect();
        artifacts.push(Artifact::json(CONVERSATIONS_FILE, &conversations)?);
    }

    Ok(artifacts)
}

fn summarize(input: &Path, dataset: &Dataset, derived: &Derived) -> Summary {
    let metadata = &derived.metadata;
    Summary {
        input: input.to_path_buf(),
        total_conversations: metadata.total_conversations,
        successful_conversations: metadata.successful_conversations,
        conversations_with_ratings: metadata.conversations_with_ratings,
        conversations_with_introspection: metadata.conversations_with_introspection,
        unique_models: metadata.models.len(),
        model_families: derived.families.len(),
        success_rate: metadata.success_rate,
        avg_response_length: metadata.avg_response_length,
        anomalies: dataset.anomalies,
        output_dir: None,
        emitted: None,
    }
}

/// Ingest and derive without writing anything
pub fn analyze(root: &Path, config: &PipelineConfig) -> Result<Summary> {
    let input = config.input_path(root);
    let dataset = ingest::load(&input)?;
    let derived = derive(&dataset, config)?;
    Ok(summarize(&input, &dataset, &derived))
}

/// Run the full pipeline once
#[tracing::instrument(skip_all, fields(root = %root.display()))]
pub fn run(root: &Path, config: &PipelineConfig) -> Result<Summary> {
    let start = Instant::now();
    let input = config.input_path(root);
    let output_dir = config.output_dir(root);

    let dataset = ingest::load(&input)?;
    trace_time!(start, "ingest", records = dataset.records.len());

    let derived = derive(&dataset, config)?;
    let artifacts = artifacts(&dataset, &derived, config)?;
    trace_time!(start, "serialize", artifacts = artifacts.len());

    let passthrough: Vec<Passthrough> = config
        .paths
        .auxiliary
        .iter()
        .map(|aux| Passthrough {
            source: config::resolve(root, &aux.source),
            target: aux.target.clone(),
        })
        .collect();

    let report = emit::emit(&output_dir, &artifacts, &passthrough)?;
    trace_time!(start, "emit", files = report.written.len());

    let mut summary = summarize(&input, &dataset, &derived);
    summary.output_dir = Some(output_dir);
    summary.emitted = Some(report);
    Ok(summary)
}
