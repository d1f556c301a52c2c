//! Reading the raw conversation export

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::warn;

use crate::bail_input;
use crate::error::{ArchiveError, Result};
use crate::record::ConversationRecord;

/// Records read from the export, plus how many shape anomalies were tolerated
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<ConversationRecord>,
    pub anomalies: usize,
}

/// Load the export at `path`.
///
/// A missing file, invalid JSON or a non-array root aborts the run. Problems
/// inside individual records are logged and absorbed.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<Dataset> {
    if !path.is_file() {
        return Err(ArchiveError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read(path).map_err(crate::map_io_err!("read", path))?;
    let root: Value = serde_json::from_slice(&content)
        .map_err(|e| ArchiveError::invalid_input(path, format!("invalid JSON: {}", e)))?;

    parse(path, root)
}

/// Turn an already parsed document into a dataset
pub fn parse(path: &Path, root: Value) -> Result<Dataset> {
    let items = match root {
        Value::Array(items) => items,
        other => bail_input!(
            path,
            format!("root must be an array, found {}", json_kind(&other))
        ),
    };

    let mut anomalies = 0;
    let records = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let (record, problems) = ConversationRecord::from_value(item);
            for problem in &problems {
                warn!(
                    record = index,
                    field = problem.field,
                    reason = problem.reason,
                    "record anomaly"
                );
            }
            anomalies += problems.len();
            record
        })
        .collect::<Vec<_>>();

    tracing::info!(records = records.len(), anomalies, "ingested export");

    Ok(Dataset { records, anomalies })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExitCode;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_input_not_found() {
        let dir = tempdir().unwrap();
        let err = load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ArchiveError::InputNotFound { .. }));
        assert_eq!(err.exit_code(), ExitCode::Data);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "[{\"model\": ").unwrap();

        let err = load(&path).unwrap_err();
        assert_eq!(err.error_type(), "invalid_input");
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_object_root_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("object.json");
        fs::write(&path, r#"{"conversations": []}"#).unwrap();

        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("root must be an array, found an object"));
    }

    #[test]
    fn test_empty_array_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "[]").unwrap();

        let dataset = load(&path).unwrap();
        assert!(dataset.records.is_empty());
        assert_eq!(dataset.anomalies, 0);
    }

    #[test]
    fn test_bad_record_does_not_abort() {
        let root = serde_json::json!([
            {"model": "openai/gpt-4", "api": "openai", "timestamp": "2025-01-01T00:00:00Z",
             "success": true, "response_length": 5, "response": "hello"},
            "garbage",
        ]);
        let dataset = parse(Path::new("inline.json"), root).unwrap();
        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.records[1].model, "unknown");
        assert_eq!(dataset.anomalies, 1);
    }
}
