//! Pipeline configuration
//!
//! Configuration is optional. When present it lives in `transcripts.toml` at
//! the root; every field has a default, so an empty file is valid.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ArchiveError, Result};
use crate::family::FamilyRules;

pub use types::{
    AuxiliaryFile, FamilyRuleConfig, IndexConfig, PathsConfig, PipelineConfig, DEFAULT_INPUT,
    DEFAULT_OUTPUT_DIR,
};

/// Config file name looked up in the root directory
pub const CONFIG_FILE: &str = "transcripts.toml";

impl PipelineConfig {
    /// Load configuration from a file.
    ///
    /// Family patterns are compiled here so a bad regex is reported against
    /// the config file.
    pub fn load(path: &Path) -> Result<Self> {
        let invalid = |reason: String| ArchiveError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let config: Self = toml::from_str(&content).map_err(|e| invalid(e.to_string()))?;

        FamilyRules::from_config(&config.families).map_err(|e| invalid(e.to_string()))?;
        Ok(config)
    }

    /// Load `transcripts.toml` from `root` if it exists, defaults otherwise
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Input path resolved against `root`
    pub fn input_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.paths.input)
    }

    /// Output directory resolved against `root`
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        resolve(root, &self.paths.output_dir)
    }
}

/// Resolve a possibly relative path against `root`
pub fn resolve(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.paths.input, DEFAULT_INPUT);
        assert_eq!(config.paths.output_dir, DEFAULT_OUTPUT_DIR);
        assert!(config.paths.write_conversations);
        assert_eq!(config.paths.auxiliary.len(), 2);
        assert_eq!(config.index.prompt_max_chars, 200);
        assert_eq!(config.index.response_max_chars, 500);
        assert_eq!(config.index.introspection_max_chars, 500);
        assert!(config.families.is_empty());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "").unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.paths.input, DEFAULT_INPUT);
        assert_eq!(config.index, IndexConfig::default());
    }

    #[test]
    fn test_partial_file_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
[paths]
input = "raw/export.json"
write_conversations = false
auxiliary = []

[index]
response_max_chars = 300

[[families]]
label = "Hermes"
pattern = "hermes"

[[families]]
label = "Llama"
pattern = "llama"
"#,
        )
        .unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.paths.input, "raw/export.json");
        assert_eq!(config.paths.output_dir, DEFAULT_OUTPUT_DIR);
        assert!(!config.paths.write_conversations);
        assert!(config.paths.auxiliary.is_empty());
        assert_eq!(config.index.response_max_chars, 300);
        assert_eq!(config.index.prompt_max_chars, 200);
        assert_eq!(config.families.len(), 2);
        assert_eq!(config.families[0].label, "Hermes");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[paths\ninput = ").unwrap();

        let err = PipelineConfig::load(&path).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidConfig { .. }));
    }

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::discover(dir.path()).unwrap();
        assert_eq!(config.paths.input, DEFAULT_INPUT);
    }

    #[test]
    fn test_invalid_family_pattern_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "[[families]]\nlabel = \"Broken\"\npattern = \"(unclosed\"\n",
        )
        .unwrap();

        let err = PipelineConfig::load(&path).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidConfig { .. }));
        assert_eq!(err.exit_code(), crate::error::ExitCode::Data);
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let root = Path::new("/srv/archive");
        assert_eq!(
            resolve(root, "data/x.json"),
            PathBuf::from("/srv/archive/data/x.json")
        );
        assert_eq!(resolve(root, "/tmp/x.json"), PathBuf::from("/tmp/x.json"));
    }
}
