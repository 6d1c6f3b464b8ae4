//! CLI library components for tabjson.

pub mod env;
pub mod logging;
pub mod paths;
pub mod pipeline;
pub mod summary;
pub mod types;
