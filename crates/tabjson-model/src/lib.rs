//! Data model for tabular-to-JSON extraction.
//!
//! - [`CellValue`], [`Row`], [`RowSet`]: what source adapters produce
//! - [`GroupedCatalog`], [`RankingTable`], [`CanonicalResult`]: what the
//!   normalization pipeline produces and the sink writes

mod cell;
mod shapes;
mod table;

pub use cell::{CellValue, format_numeric, parse_f64, parse_i64};
pub use shapes::{
    CanonicalResult, GroupedCatalog, RANKING_FIELDS, RankingRecord, RankingTable, Shape,
};
pub use table::{Row, RowSet};
