//! The source adapter contract and file-source selection.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tabjson_model::{CellValue, RowSet};

use crate::delimited::DelimitedSource;
use crate::error::{IngestError, Result};
use crate::spreadsheet::SpreadsheetSource;

/// Anything that yields an ordered set of rows.
///
/// Implementations acquire their resources (connections, file handles) inside
/// `fetch` or hold them for their own lifetime; nothing outlives the source.
pub trait TabularSource {
    /// Human-readable origin used in logs and summaries.
    fn describe(&self) -> String;

    /// Reads every row. Row order is the source order.
    fn fetch(&mut self) -> Result<RowSet>;
}

impl<T: TabularSource + ?Sized> TabularSource for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn fetch(&mut self) -> Result<RowSet> {
        (**self).fetch()
    }
}

/// Zero-based source columns to read, in output order, plus text hints.
///
/// A column listed in `text_columns` is rendered as text whatever the source
/// typed it as, so identifiers and score labels never go through a float.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    pub indices: Vec<usize>,
    pub text_columns: BTreeSet<usize>,
}

impl ColumnSelection {
    pub fn new(indices: Vec<usize>) -> Self {
        Self {
            indices,
            text_columns: BTreeSet::new(),
        }
    }

    /// The first `count` columns.
    pub fn first(count: usize) -> Self {
        Self::new((0..count).collect())
    }

    /// Reads source column `index` as text.
    #[must_use]
    pub fn with_text_column(mut self, index: usize) -> Self {
        self.text_columns.insert(index);
        self
    }

    pub fn is_text(&self, index: usize) -> bool {
        self.text_columns.contains(&index)
    }

    /// Fails on the first selected index at or past `width`.
    pub fn check_width(&self, path: &Path, width: usize) -> Result<()> {
        match self.indices.iter().find(|&&index| index >= width) {
            Some(&index) => Err(IngestError::ColumnOutOfRange {
                path: path.to_path_buf(),
                index,
                width,
            }),
            None => Ok(()),
        }
    }

    /// Applies the text hint for source column `index`.
    pub(crate) fn coerce(&self, index: usize, cell: CellValue) -> CellValue {
        if !self.is_text(index) {
            return cell;
        }
        match cell.to_text() {
            Some(text) => CellValue::Text(text),
            None => cell,
        }
    }
}

/// File formats a file-backed source understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Spreadsheet,
    Delimited,
}

impl SourceFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Spreadsheet),
            "csv" | "tsv" | "txt" => Some(Self::Delimited),
            _ => None,
        }
    }
}

/// Opens the adapter matching `path`'s extension.
///
/// `delimiter` only applies to delimited text.
pub fn open_file_source(
    path: impl Into<PathBuf>,
    selection: ColumnSelection,
    delimiter: u8,
) -> Result<Box<dyn TabularSource>> {
    let path = path.into();
    match SourceFormat::from_path(&path) {
        Some(SourceFormat::Spreadsheet) => Ok(Box::new(SpreadsheetSource::new(path, selection))),
        Some(SourceFormat::Delimited) => {
            Ok(Box::new(DelimitedSource::new(path, selection).with_delimiter(delimiter)))
        }
        None => Err(IngestError::UnsupportedFormat { path }),
    }
}

/// Checks that `path` is a regular file, so a missing input surfaces as
/// `FileNotFound` whichever reader library opens it.
pub(crate) fn ensure_readable(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::from_io(path, e))?;
    if metadata.is_dir() {
        return Err(IngestError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::other("path is a directory"),
        });
    }
    Ok(())
}
