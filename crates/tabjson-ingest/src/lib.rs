//! Tabular source adapters.
//!
//! Every adapter implements [`TabularSource`] and yields a [`RowSet`], so the
//! normalization stage never knows where rows came from.
//!
//! # Sources
//!
//! - **ClickHouse**: a fixed query over the HTTP interface ([`ClickHouseSource`])
//! - **Spreadsheets**: xlsx/xls/ods through `calamine` ([`SpreadsheetSource`])
//! - **Delimited text**: tab- or comma-separated files through Polars ([`DelimitedSource`])
//!
//! # Example
//!
//! ```ignore
//! use tabjson_ingest::{ColumnSelection, TabularSource, open_file_source};
//!
//! let selection = ColumnSelection::first(3).with_text_column(0);
//! let mut source = open_file_source("ranking.xlsx", selection, b'\t')?;
//! let rows = source.fetch()?;
//! ```
//!
//! [`RowSet`]: tabjson_model::RowSet

mod clickhouse;
mod delimited;
mod error;
mod source;
mod spreadsheet;

// === Error Types ===
pub use error::{ErrorCategory, IngestError, Result};

// === Source Contract ===
pub use source::{ColumnSelection, SourceFormat, TabularSource, open_file_source};

// === Adapters ===
pub use clickhouse::{
    ClickHouseConfig, ClickHouseSource, ConfigError, DATABASE_VAR, DEFAULT_DATABASE, DEFAULT_HOST,
    DEFAULT_PORT, DEFAULT_USER, HOST_VAR, PASSWORD_VAR, PORT_VAR, USER_VAR,
};
pub use delimited::{DEFAULT_DELIMITER, DelimitedSource, read_header};
pub use spreadsheet::SpreadsheetSource;
