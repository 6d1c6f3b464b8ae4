//! Positional projection of rows into ranking records, with an optional
//! score threshold.

use serde::Serialize;
use tracing::{debug, info, trace};

use tabjson_model::{CellValue, RANKING_FIELDS, RankingRecord, RankingTable, Row};

use crate::error::{ParseError, Result, TransformError};
use crate::threshold::Threshold;

/// Why a source row did not become a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DropReason {
    /// A required cell was missing or could not be coerced.
    Parse(ParseError),
    /// The score parsed but is under the threshold.
    BelowThreshold { score: f64 },
}

/// A source row that was left out, by zero-based position in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedRecord {
    pub row: usize,
    pub reason: DropReason,
}

/// Result of [`project_and_filter`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub table: RankingTable,
    pub input_count: usize,
    pub dropped: Vec<DroppedRecord>,
}

impl FilterOutcome {
    pub fn kept(&self) -> usize {
        self.table.len()
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }

    pub fn below_threshold_count(&self) -> usize {
        self.dropped
            .iter()
            .filter(|record| matches!(record.reason, DropReason::BelowThreshold { .. }))
            .count()
    }

    pub fn parse_error_count(&self) -> usize {
        self.dropped
            .iter()
            .filter(|record| matches!(record.reason, DropReason::Parse(_)))
            .count()
    }
}

/// Projects each row onto `score`, `num`, `accumulate`.
///
/// `selection[n]` is the row position that becomes the n-th field, whatever
/// the source called it. `score` is kept as text; `num` and `accumulate` must
/// be integers. With a threshold, a score that does not parse as a number or
/// falls below the minimum drops the row. Kept rows stay in input order.
///
/// Only a malformed selection is an error; bad rows are counted in
/// [`FilterOutcome::dropped`].
pub fn project_and_filter(
    rows: &[Row],
    selection: &[usize],
    threshold: Option<Threshold>,
) -> Result<FilterOutcome> {
    let [score_at, num_at, accumulate_at] = selection else {
        return Err(TransformError::SelectionArity {
            expected: RANKING_FIELDS.len(),
            actual: selection.len(),
            fields: RANKING_FIELDS.join(", "),
        });
    };

    let mut kept = Vec::with_capacity(rows.len());
    let mut dropped = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        match project_row(row, *score_at, *num_at, *accumulate_at, threshold) {
            Ok(record) => {
                trace!(row = index, score = %record.score, "kept record");
                kept.push(record);
            }
            Err(reason) => {
                debug!(row = index, ?reason, "dropped record");
                dropped.push(DroppedRecord { row: index, reason });
            }
        }
    }

    let outcome = FilterOutcome {
        table: RankingTable::new(kept),
        input_count: rows.len(),
        dropped,
    };
    info!(
        input = outcome.input_count,
        kept = outcome.kept(),
        below_threshold = outcome.below_threshold_count(),
        parse_errors = outcome.parse_error_count(),
        threshold = threshold.map(|t| t.minimum),
        "projected ranking rows"
    );
    Ok(outcome)
}

fn project_row(
    row: &Row,
    score_at: usize,
    num_at: usize,
    accumulate_at: usize,
    threshold: Option<Threshold>,
) -> std::result::Result<RankingRecord, DropReason> {
    let score = score_text(cell(row, score_at)).map_err(DropReason::Parse)?;
    let num = integer(cell(row, num_at), RANKING_FIELDS[1]).map_err(DropReason::Parse)?;
    let accumulate =
        integer(cell(row, accumulate_at), RANKING_FIELDS[2]).map_err(DropReason::Parse)?;

    if let Some(threshold) = threshold {
        let value = tabjson_model::parse_f64(&score)
            .filter(|v| !v.is_nan())
            .ok_or_else(|| {
                DropReason::Parse(ParseError::new(RANKING_FIELDS[0], &score, "number"))
            })?;
        if !threshold.admits(value) {
            return Err(DropReason::BelowThreshold { score: value });
        }
    }

    Ok(RankingRecord::new(score, num, accumulate))
}

fn cell(row: &Row, at: usize) -> &CellValue {
    row.get(at).unwrap_or(&CellValue::Null)
}

fn score_text(cell: &CellValue) -> std::result::Result<String, ParseError> {
    cell.to_text()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ParseError::new(RANKING_FIELDS[0], display_cell(cell), "text"))
}

fn integer(cell: &CellValue, field: &'static str) -> std::result::Result<i64, ParseError> {
    cell.as_i64()
        .ok_or_else(|| ParseError::new(field, display_cell(cell), "integer"))
}

fn display_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::List(items) => format!("[{}]", items.join(", ")),
        other => other.to_text().unwrap_or_default(),
    }
}
