//! JSON artifact writing and reading.
//!
//! Artifacts are UTF-8, indented with two spaces, keep non-ASCII text literal,
//! and end with a newline. The whole document is rendered in memory before
//! the target file is touched, so a failed run never leaves a half-written
//! artifact behind.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use tabjson_model::{CanonicalResult, GroupedCatalog, RankingTable, Shape};

use crate::error::{OutputError, Result};

/// Renders `result` as artifact text.
pub fn to_json_string(result: &CanonicalResult) -> Result<String> {
    let mut text = serde_json::to_string_pretty(result).map_err(OutputError::Serialize)?;
    text.push('\n');
    Ok(text)
}

/// Writes `result` to `path`, creating parent directories and replacing any
/// existing file. Returns the path written.
pub fn write_json(result: &CanonicalResult, path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let text = to_json_string(result)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| OutputError::SinkWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text.as_bytes()).map_err(|source| OutputError::SinkWrite {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        shape = result.shape_name(),
        entries = result.entry_count(),
        bytes = text.len(),
        "wrote JSON artifact"
    );
    Ok(path.to_path_buf())
}

/// Reads an artifact written by [`write_json`], detecting its shape.
///
/// `{"data": []}` is always read as an empty ranking table; use
/// [`read_json_as`] when the shape is known.
pub fn read_json(path: impl AsRef<Path>) -> Result<CanonicalResult> {
    let path = path.as_ref();
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| malformed(path, source))
}

/// Reads an artifact that must have `shape`.
pub fn read_json_as(path: impl AsRef<Path>, shape: Shape) -> Result<CanonicalResult> {
    let path = path.as_ref();
    let text = read_text(path)?;
    let parsed = match shape {
        Shape::Flat => serde_json::from_str::<RankingTable>(&text).map(CanonicalResult::Flat),
        Shape::Grouped => {
            serde_json::from_str::<GroupedCatalog>(&text).map(CanonicalResult::Grouped)
        }
    };
    parsed.map_err(|source| malformed(path, source))
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| OutputError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn malformed(path: &Path, source: serde_json::Error) -> OutputError {
    OutputError::Malformed {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabjson_model::{GroupedCatalog, RankingRecord, RankingTable};

    #[test]
    fn keeps_non_ascii_literal() {
        let mut catalog = GroupedCatalog::new();
        catalog.insert("湖北", "武汉");
        let text = to_json_string(&catalog.into()).unwrap();
        assert!(text.contains("\"湖北\""));
        assert!(!text.contains("\\u"));
        assert!(text.ends_with("]\n}\n"));
    }

    #[test]
    fn flat_table_uses_data_envelope() {
        let table = RankingTable::new(vec![RankingRecord::new("120", 5, 5)]);
        let text = to_json_string(&table.into()).unwrap();
        assert!(text.starts_with("{\n  \"data\": [\n    {\n      \"score\": \"120\""));
    }

    #[test]
    fn unreadable_artifact_is_read_error() {
        let err = read_json("/nonexistent/province_city.json").unwrap_err();
        assert!(matches!(err, OutputError::Read { .. }));
    }
}
