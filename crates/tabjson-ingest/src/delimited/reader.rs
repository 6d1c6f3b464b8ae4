//! Delimited file reading into a Polars DataFrame.

use std::path::PathBuf;
use std::sync::Arc;

use polars::prelude::*;
use tracing::info;

use tabjson_model::{CellValue, RowSet};

use crate::error::{IngestError, Result};
use crate::source::{ColumnSelection, TabularSource, ensure_readable};

use super::header::read_header;

/// Tab, as published score tables use.
pub const DEFAULT_DELIMITER: u8 = b'\t';

/// Reads selected columns of a delimited UTF-8 file with a header row.
///
/// Column types are inferred over the whole file, except that text-hinted
/// columns are pinned to `String` so long digit strings keep every digit.
#[derive(Debug, Clone)]
pub struct DelimitedSource {
    path: PathBuf,
    selection: ColumnSelection,
    delimiter: u8,
}

impl DelimitedSource {
    pub fn new(path: impl Into<PathBuf>, selection: ColumnSelection) -> Self {
        Self {
            path: path.into(),
            selection,
            delimiter: DEFAULT_DELIMITER,
        }
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Reads the data rows with positional column names.
    ///
    /// The header line is skipped rather than parsed, so Polars names columns
    /// `column_1`, `column_2`, ... whatever the header cells contain. Text hints
    /// pin those positional names to `String`. Returns `None` when the file has
    /// no data rows.
    fn read_frame(&self) -> Result<Option<DataFrame>> {
        let mut overwrite = Schema::default();
        let mut pinned = 0usize;
        for &index in &self.selection.indices {
            if self.selection.is_text(index) {
                overwrite.with_column(positional_name(index).into(), DataType::String);
                pinned += 1;
            }
        }

        let mut options = CsvReadOptions::default()
            .with_has_header(false)
            .with_skip_rows(1)
            .with_infer_schema_length(None)
            .with_parse_options(CsvParseOptions::default().with_separator(self.delimiter));
        if pinned > 0 {
            options = options.with_schema_overwrite(Some(Arc::new(overwrite)));
        }

        let frame = options
            .try_into_reader_with_file_path(Some(self.path.clone()))
            .and_then(SerReader::finish);
        match frame {
            Ok(frame) if frame.height() == 0 => Ok(None),
            Ok(frame) => Ok(Some(frame)),
            Err(PolarsError::NoData(_)) => Ok(None),
            Err(e) => Err(self.parse_error(&e)),
        }
    }

    fn parse_error(&self, error: &PolarsError) -> IngestError {
        IngestError::CsvParse {
            path: self.path.clone(),
            message: error.to_string(),
        }
    }
}

impl TabularSource for DelimitedSource {
    fn describe(&self) -> String {
        format!("delimited file {}", self.path.display())
    }

    fn fetch(&mut self) -> Result<RowSet> {
        ensure_readable(&self.path)?;
        let headers = read_header(&self.path, self.delimiter)?;
        self.selection.check_width(&self.path, headers.len())?;

        let selected_headers: Vec<String> = self
            .selection
            .indices
            .iter()
            .map(|&index| headers.get(index).cloned().unwrap_or_default())
            .collect();
        let mut rows = RowSet::new(selected_headers);
        let Some(frame) = self.read_frame()? else {
            info!(path = %self.path.display(), "delimited file has no data rows");
            return Ok(rows);
        };
        let columns = frame.get_columns();
        self.selection.check_width(&self.path, columns.len())?;

        for row in 0..frame.height() {
            let mut cells = Vec::with_capacity(self.selection.indices.len());
            for &index in &self.selection.indices {
                let value = columns[index]
                    .get(row)
                    .map_err(|e| self.parse_error(&e))?;
                cells.push(self.selection.coerce(index, cell_from_any(value)));
            }
            if cells.iter().all(CellValue::is_blank) {
                continue;
            }
            rows.push_row(cells);
        }

        info!(
            path = %self.path.display(),
            width = columns.len(),
            rows = rows.len(),
            "delimited file loaded"
        );
        Ok(rows)
    }
}

/// Polars name for the column at zero-based `index` of a headerless read.
fn positional_name(index: usize) -> String {
    format!("column_{}", index + 1)
}

/// Converts a Polars `AnyValue` to a [`CellValue`].
fn cell_from_any(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Null,
        AnyValue::Int32(v) => CellValue::Integer(i64::from(v)),
        AnyValue::Int64(v) => CellValue::Integer(v),
        AnyValue::UInt32(v) => CellValue::Integer(i64::from(v)),
        AnyValue::UInt64(v) => match i64::try_from(v) {
            Ok(v) => CellValue::Integer(v),
            Err(_) => CellValue::Text(v.to_string()),
        },
        AnyValue::Float32(v) => CellValue::Float(f64::from(v)),
        AnyValue::Float64(v) => CellValue::Float(v),
        AnyValue::String(s) => CellValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => CellValue::Text(s.to_string()),
        AnyValue::Boolean(b) => CellValue::Bool(b),
        other => CellValue::Text(other.to_string()),
    }
}
