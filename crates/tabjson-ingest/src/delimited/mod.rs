//! Delimited text reading.

mod header;
mod reader;

pub use header::read_header;
pub use reader::{DEFAULT_DELIMITER, DelimitedSource};
