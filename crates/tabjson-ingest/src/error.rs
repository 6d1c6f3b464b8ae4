//! Error types for tabular sources.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::clickhouse::ConfigError;

/// Coarse classification used by callers to report failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The backing store is unreachable or rejected the credentials.
    Connection,
    /// A file or query result could not be read into rows.
    SourceRead,
}

/// Errors that can occur while fetching rows from a source.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Connection Errors ===
    /// Endpoint could not be reached.
    #[error("cannot connect to {endpoint}: {message}")]
    Connection { endpoint: String, message: String },

    /// Endpoint rejected the credentials.
    #[error("{endpoint} rejected credentials for user '{user}': {message}")]
    Unauthorized {
        endpoint: String,
        user: String,
        message: String,
    },

    /// Connection settings could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    // === Query Errors ===
    /// The server answered the query with an error status.
    #[error("query failed with HTTP {status}: {message}")]
    Query { status: u16, message: String },

    /// The query response body could not be decoded.
    #[error("cannot decode query response: {message}")]
    Decode { message: String },

    /// The result has a different column count than the caller expects.
    #[error("query returned {actual} columns, expected {expected}")]
    ArityMismatch { expected: usize, actual: usize },

    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension does not name a supported format.
    #[error("unsupported input format for {path}")]
    UnsupportedFormat { path: PathBuf },

    // === Parsing Errors ===
    /// Workbook could not be opened or a sheet could not be read.
    #[error("failed to read spreadsheet {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    /// Workbook has no worksheet at the requested position.
    #[error("spreadsheet {path} has no sheet at index {sheet}")]
    EmptySheet { path: PathBuf, sheet: usize },

    /// Delimited text could not be parsed.
    #[error("failed to parse {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// A requested column index is past the last column.
    #[error("column index {index} out of range: {path} has {width} columns")]
    ColumnOutOfRange {
        path: PathBuf,
        index: usize,
        width: usize,
    },
}

impl IngestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Connection { .. } | Self::Unauthorized { .. } | Self::Config(_) => {
                ErrorCategory::Connection
            }
            _ => ErrorCategory::SourceRead,
        }
    }

    pub fn is_connection_error(&self) -> bool {
        self.category() == ErrorCategory::Connection
    }

    pub(crate) fn from_io(path: &Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source: error,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/table.xlsx"),
        };
        assert_eq!(err.to_string(), "file not found: /path/to/table.xlsx");
    }

    #[test]
    fn test_error_categories() {
        let connection = IngestError::Connection {
            endpoint: "http://localhost:8123".to_string(),
            message: "refused".to_string(),
        };
        assert!(connection.is_connection_error());

        let range = IngestError::ColumnOutOfRange {
            path: PathBuf::from("a.tsv"),
            index: 3,
            width: 2,
        };
        assert_eq!(range.category(), ErrorCategory::SourceRead);
    }

    #[test]
    fn test_not_found_io_maps_to_file_not_found() {
        let err = IngestError::from_io(
            Path::new("missing.xlsx"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }
}
