//! Configuration type definitions

use serde::Deserialize;

/// Default location of the raw export, relative to the root
pub const DEFAULT_INPUT: &str = "data/conversations_full.json";

/// Default output directory served by the front end, relative to the root
pub const DEFAULT_OUTPUT_DIR: &str = "client/public/data";

/// Pipeline configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineConfig {
    /// Input/output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Search index truncation limits
    #[serde(default)]
    pub index: IndexConfig,

    /// Ordered model family rules; empty means the built-in rule list
    #[serde(default)]
    pub families: Vec<FamilyRuleConfig>,
}

/// Input and output locations
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Raw conversation export (JSON array)
    #[serde(default = "default_input")]
    pub input: String,

    /// Directory the artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Emit the id-annotated `conversations.json`
    #[serde(default = "default_write_conversations")]
    pub write_conversations: bool,

    /// Side files copied verbatim into the output directory
    #[serde(default = "default_auxiliary")]
    pub auxiliary: Vec<AuxiliaryFile>,
}

/// A file copied byte-for-byte into the output directory
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuxiliaryFile {
    /// Source path, relative to the root
    pub source: String,
    /// File name inside the output directory
    pub target: String,
}

/// Per-field maximum lengths (in characters) for the search index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_prompt_max_chars")]
    pub prompt_max_chars: usize,

    #[serde(default = "default_response_max_chars")]
    pub response_max_chars: usize,

    #[serde(default = "default_introspection_max_chars")]
    pub introspection_max_chars: usize,
}

/// One model family rule; evaluated in file order
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FamilyRuleConfig {
    /// Family name emitted in the outputs
    pub label: String,
    /// Case-insensitive regular expression matched against the model id
    pub pattern: String,
}

fn default_input() -> String {
    DEFAULT_INPUT.to_string()
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_write_conversations() -> bool {
    true
}

fn default_auxiliary() -> Vec<AuxiliaryFile> {
    vec![
        AuxiliaryFile {
            source: "data/model_fingerprints.csv".to_string(),
            target: "model-fingerprints.csv".to_string(),
        },
        AuxiliaryFile {
            source: "data/model_architecture.csv".to_string(),
            target: "model-architecture.csv".to_string(),
        },
    ]
}

fn default_prompt_max_chars() -> usize {
    200
}

fn default_response_max_chars() -> usize {
    500
}

fn default_introspection_max_chars() -> usize {
    500
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            input: default_input(),
            output_dir: default_output_dir(),
            write_conversations: default_write_conversations(),
            auxiliary: default_auxiliary(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            prompt_max_chars: default_prompt_max_chars(),
            response_max_chars: default_response_max_chars(),
            introspection_max_chars: default_introspection_max_chars(),
        }
    }
}
