//! JSON sink for canonical results.

pub mod error;
pub mod json;

pub use error::{OutputError, Result};
pub use json::{read_json, read_json_as, to_json_string, write_json};
