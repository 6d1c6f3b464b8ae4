//! Normalization of source rows into canonical structures.
//!
//! - **group**: key → members catalog from a two-column row set
//! - **project**: positional projection into ranking records with an optional
//!   score threshold
//!
//! Everything here is pure: no I/O, and the same input always yields the
//! same structure.

pub mod error;
pub mod group;
pub mod project;
pub mod threshold;

pub use error::{ParseError, Result, TransformError};
pub use group::group;
pub use project::{DropReason, DroppedRecord, FilterOutcome, project_and_filter};
pub use threshold::Threshold;
