//! Spreadsheet reading (xlsx, xls, ods) through `calamine`.
//!
//! The first row of the sheet is the header; every following row that has at
//! least one non-blank selected cell becomes a data row. Column indices are
//! absolute sheet columns (`0` is column A) even when the used range starts
//! further right.

use std::path::PathBuf;

use calamine::{Data, Range, Reader, open_workbook_auto};
use tracing::{debug, info};

use tabjson_model::{CellValue, RowSet};

use crate::error::{IngestError, Result};
use crate::source::{ColumnSelection, TabularSource, ensure_readable};

/// Position of the worksheet that is read.
const FIRST_SHEET: usize = 0;

/// Reads selected columns of the first worksheet.
#[derive(Debug, Clone)]
pub struct SpreadsheetSource {
    path: PathBuf,
    selection: ColumnSelection,
}

impl SpreadsheetSource {
    pub fn new(path: impl Into<PathBuf>, selection: ColumnSelection) -> Self {
        Self {
            path: path.into(),
            selection,
        }
    }

    fn load_range(&self) -> Result<Range<Data>> {
        ensure_readable(&self.path)?;
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| IngestError::Spreadsheet {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        workbook
            .worksheet_range_at(FIRST_SHEET)
            .ok_or_else(|| IngestError::EmptySheet {
                path: self.path.clone(),
                sheet: FIRST_SHEET,
            })?
            .map_err(|e| IngestError::Spreadsheet {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }
}

impl TabularSource for SpreadsheetSource {
    fn describe(&self) -> String {
        format!("spreadsheet {}", self.path.display())
    }

    fn fetch(&mut self) -> Result<RowSet> {
        let range = self.load_range()?;
        let (last_row, last_col) = range.end().unwrap_or((0, 0));
        let width = if range.is_empty() {
            0
        } else {
            last_col as usize + 1
        };
        self.selection.check_width(&self.path, width)?;

        let cell_at = |row: u32, col: usize| -> CellValue {
            u32::try_from(col)
                .ok()
                .and_then(|col| range.get_value((row, col)))
                .map_or(CellValue::Null, cell_from_data)
        };

        let headers: Vec<String> = self
            .selection
            .indices
            .iter()
            .map(|&col| cell_at(0, col).to_text().unwrap_or_default().trim().to_string())
            .collect();

        let mut rows = RowSet::new(headers);
        let mut blank_rows = 0usize;
        for row in 1..=last_row {
            let cells: Vec<CellValue> = self
                .selection
                .indices
                .iter()
                .map(|&col| self.selection.coerce(col, cell_at(row, col)))
                .collect();
            if cells.iter().all(CellValue::is_blank) {
                blank_rows += 1;
                continue;
            }
            rows.push_row(cells);
        }

        if blank_rows > 0 {
            debug!(path = %self.path.display(), blank_rows, "skipped blank spreadsheet rows");
        }
        info!(
            path = %self.path.display(),
            width,
            rows = rows.len(),
            "spreadsheet loaded"
        );
        Ok(rows)
    }
}

/// Converts a `calamine` cell to a [`CellValue`].
fn cell_from_data(value: &Data) -> CellValue {
    match value {
        Data::Empty => CellValue::Null,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Int(v) => CellValue::Integer(*v),
        Data::Float(v) => CellValue::Float(*v),
        Data::Bool(v) => CellValue::Bool(*v),
        Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::Text(text.clone()),
        Data::Error(error) => {
            debug!(?error, "spreadsheet cell holds an error value");
            CellValue::Null
        }
        other => CellValue::Text(other.to_string()),
    }
}
