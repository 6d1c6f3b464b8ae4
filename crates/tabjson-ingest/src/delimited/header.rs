//! Header line parsing for delimited files.

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

/// Reads the header row of a delimited file.
///
/// A leading UTF-8 BOM is dropped and names are trimmed. An empty file yields
/// no headers.
pub fn read_header(path: &Path, delimiter: u8) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;
    let Some(first) = reader.records().next() else {
        return Ok(Vec::new());
    };
    let record = first.map_err(|e| csv_error(path, e))?;
    Ok(record
        .iter()
        .map(|name| name.trim().trim_start_matches('\u{feff}').trim().to_string())
        .collect())
}

fn csv_error(path: &Path, error: csv::Error) -> IngestError {
    match error.into_kind() {
        csv::ErrorKind::Io(io) => IngestError::from_io(path, io),
        other => IngestError::CsvParse {
            path: path.to_path_buf(),
            message: format!("{other:?}"),
        },
    }
}
