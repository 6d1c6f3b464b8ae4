use serde::{Deserialize, Serialize};

use crate::CellValue;

/// One source row: cells in source column order.
pub type Row = Vec<CellValue>;

/// Ordered rows produced by a source adapter.
///
/// `headers` carries the source column names when the source has them; rows
/// are never reordered after fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowSet {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl RowSet {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Column count: the header width, or the widest row for headerless sets.
    pub fn width(&self) -> usize {
        if self.headers.is_empty() {
            self.rows.iter().map(Vec::len).max().unwrap_or(0)
        } else {
            self.headers.len()
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
