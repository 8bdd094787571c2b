//! JSON file backend for [`RecordStore`].
//!
//! [`JsonFileStore`] reads the record set from one path and writes the
//! updated set to another (or the same) path. Output is pretty-printed with
//! a trailing newline and is written through a temporary file in the target
//! directory, then renamed into place, so a failed write never leaves a
//! truncated output behind. The target directory must already exist.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::StorageError;
use crate::traits::RecordStore;
use crate::types::RecordSet;

/// Reads records from `input`, writes them to `output`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    input: PathBuf,
    output: PathBuf,
}

impl JsonFileStore {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        JsonFileStore {
            input: input.into(),
            output: output.into(),
        }
    }

    /// A store that overwrites its own input.
    pub fn in_place(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        JsonFileStore {
            input: path.clone(),
            output: path,
        }
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> Result<RecordSet, StorageError> {
        let text = fs::read_to_string(&self.input).map_err(|e| StorageError::io(&self.input, e))?;
        let value: Value = serde_json::from_str(&text)?;
        let set = RecordSet::from_value(value)?;
        debug!("loaded {} record(s) from {}", set.nodes.len(), self.input.display());
        Ok(set)
    }

    fn save(&mut self, set: &RecordSet) -> Result<(), StorageError> {
        let mut text = serde_json::to_string_pretty(&set.to_value()?)?;
        text.push('\n');
        write_atomic(&self.output, text.as_bytes())?;
        debug!("wrote {} record(s) to {}", set.nodes.len(), self.output.display());
        Ok(())
    }
}

/// Writes `bytes` to a temporary sibling of `path`, then renames it over
/// `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StorageError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| StorageError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| StorageError::io(path, e.error))?;
    Ok(())
}
