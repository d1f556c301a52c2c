//! Writing the artifacts to the output directory
//!
//! Every artifact is serialized before anything touches the disk. Each file
//! is then written to `<name>.tmp` next to its destination and renamed into
//! place, so a reader never sees a half-written file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::map_io_err;

pub const METADATA_FILE: &str = "metadata.json";
pub const SEARCH_INDEX_FILE: &str = "search-index.json";
pub const MODEL_FAMILIES_FILE: &str = "model-families.json";
pub const CONVERSATIONS_FILE: &str = "conversations.json";

/// A serialized artifact waiting to be written
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub contents: Vec<u8>,
}

impl Artifact {
    /// Pretty-print `value` as two-space indented JSON
    pub fn json<T: Serialize + ?Sized>(name: &str, value: &T) -> Result<Self> {
        Ok(Artifact {
            name: name.to_string(),
            contents: serde_json::to_vec_pretty(value)?,
        })
    }
}

/// A side file to copy verbatim
#[derive(Debug, Clone)]
pub struct Passthrough {
    pub source: PathBuf,
    pub target: String,
}

/// What an emit pass did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmitReport {
    /// File names written into the output directory, in write order
    pub written: Vec<String>,
    /// Passthrough sources that did not exist
    pub skipped: Vec<PathBuf>,
}

/// Write `artifacts` and copy `passthrough` files into `output_dir`,
/// creating the directory if needed.
#[tracing::instrument(skip_all, fields(output_dir = %output_dir.display()))]
pub fn emit(
    output_dir: &Path,
    artifacts: &[Artifact],
    passthrough: &[Passthrough],
) -> Result<EmitReport> {
    fs::create_dir_all(output_dir).map_err(map_io_err!("create directory", output_dir))?;

    let mut report = EmitReport::default();

    for artifact in artifacts {
        let dest = output_dir.join(&artifact.name);
        write_atomic(&dest, &artifact.contents)?;
        debug!(file = %artifact.name, bytes = artifact.contents.len(), "wrote artifact");
        report.written.push(artifact.name.clone());
    }

    for file in passthrough {
        if !file.source.is_file() {
            warn!(source = %file.source.display(), "auxiliary file not found, skipping");
            report.skipped.push(file.source.clone());
            continue;
        }
        let dest = output_dir.join(&file.target);
        copy_atomic(&file.source, &dest)?;
        debug!(source = %file.source.display(), file = %file.target, "copied auxiliary file");
        report.written.push(file.target.clone());
    }

    Ok(report)
}

fn temp_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    dest.with_file_name(name)
}

fn write_atomic(dest: &Path, contents: &[u8]) -> Result<()> {
    let temp = temp_path(dest);
    let result = write_file(&temp, contents)
        .and_then(|()| fs::rename(&temp, dest).map_err(map_io_err!("rename", temp)));
    discard_on_error(&temp, result)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let file = File::create(path).map_err(map_io_err!("create", path))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents)
        .and_then(|_| writer.flush())
        .map_err(map_io_err!("write", path))
}

fn copy_atomic(source: &Path, dest: &Path) -> Result<()> {
    let temp = temp_path(dest);
    let result = fs::copy(source, &temp)
        .map_err(map_io_err!("copy", source))
        .and_then(|_| fs::rename(&temp, dest).map_err(map_io_err!("rename", temp)));
    discard_on_error(&temp, result)
}

/// Remove a leftover temp file when the write did not complete
fn discard_on_error(temp: &Path, result: Result<()>) -> Result<()> {
    if result.is_err() && temp.exists() {
        if let Err(e) = fs::remove_file(temp) {
            warn!(file = %temp.display(), error = %e, "failed to remove temp file");
        }
    }
    result
}
