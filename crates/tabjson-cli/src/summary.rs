//! Console summaries of canonical results.
//!
//! Every `render_*` function is pure and returns the text to print, so a
//! summary can never fail a run. Empty structures render as zero counts.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabjson_model::{CanonicalResult, GroupedCatalog, RankingRecord, RankingTable};
use tabjson_transform::FilterOutcome;

use crate::types::{CitiesRun, InspectRun, RankingReport, RankingRun};

/// Groups listed in the top-groups table.
pub const TOP_GROUPS: usize = 5;
/// Members listed for the sample group before truncating.
pub const SAMPLE_MEMBERS: usize = 10;
/// Records shown in a ranking preview.
pub const PREVIEW_RECORDS: usize = 5;

/// Group and member counts, the largest groups, and a sample group.
pub fn render_catalog(catalog: &GroupedCatalog, styled: bool) -> String {
    let mut lines = vec![
        format!("groups: {}", catalog.group_count()),
        format!("members: {}", catalog.member_count()),
    ];
    let ordered = catalog.by_member_count();
    if ordered.is_empty() {
        return finish(lines);
    }

    let mut table = new_table(styled);
    table.set_header(vec![header_cell("#"), header_cell("Group"), header_cell("Members")]);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (rank, (key, members)) in ordered.iter().take(TOP_GROUPS).enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            key_cell(key),
            Cell::new(members.len()),
        ]);
    }
    lines.push(String::new());
    lines.push(format!("top groups by member count (first {TOP_GROUPS}):"));
    lines.push(table.to_string());

    if let Some((key, members)) = ordered.first() {
        lines.push(String::new());
        lines.push(format!("sample: {key}"));
        lines.extend(
            members
                .iter()
                .take(SAMPLE_MEMBERS)
                .map(|member| format!("  - {member}")),
        );
        if members.len() > SAMPLE_MEMBERS {
            lines.push(format!("  ... and {} more", members.len() - SAMPLE_MEMBERS));
        }
    }
    finish(lines)
}

/// Record count and a preview of the first records.
pub fn render_table(table: &RankingTable, styled: bool) -> String {
    let mut lines = vec![format!("records: {}", table.len())];
    if let Some(preview) = preview_table(&table.data, styled) {
        lines.push(String::new());
        lines.push(format!("preview (first {PREVIEW_RECORDS}):"));
        lines.push(preview);
    }
    finish(lines)
}

/// Input, kept and filtered counts of one projection, then the preview.
pub fn render_outcome(outcome: &FilterOutcome, styled: bool) -> String {
    let mut lines = vec![
        format!("input records: {}", outcome.input_count),
        format!("kept: {}", outcome.kept()),
        format!(
            "filtered out: {} (below threshold: {}, unparsable: {})",
            outcome.dropped_count(),
            outcome.below_threshold_count(),
            outcome.parse_error_count()
        ),
    ];
    if let Some(preview) = preview_table(&outcome.table.data, styled) {
        lines.push(String::new());
        lines.push(format!("preview (first {PREVIEW_RECORDS}):"));
        lines.push(preview);
    }
    finish(lines)
}

pub fn render_result(result: &CanonicalResult, styled: bool) -> String {
    match result {
        CanonicalResult::Grouped(catalog) => render_catalog(catalog, styled),
        CanonicalResult::Flat(table) => render_table(table, styled),
    }
}

pub fn render_cities(run: &CitiesRun, styled: bool) -> String {
    format!(
        "source: {}\noutput: {}\n{}",
        run.source,
        run.output.display(),
        render_catalog(&run.catalog, styled)
    )
}

pub fn render_ranking(run: &RankingRun, styled: bool) -> String {
    let threshold = run
        .threshold
        .map_or_else(|| "none".to_string(), |t| format!(">= {t}"));
    format!(
        "== {} ==\ninput: {}\noutput: {}\nthreshold: {threshold}\n{}",
        run.category,
        run.input.display(),
        run.output.display(),
        render_outcome(&run.outcome, styled)
    )
}

pub fn render_inspect(run: &InspectRun, styled: bool) -> String {
    format!(
        "artifact: {}\nshape: {}\n{}",
        run.path.display(),
        run.result.shape_name(),
        render_result(&run.result, styled)
    )
}

/// Final tally line of a multi-category run.
pub fn render_processed(report: &RankingReport) -> String {
    format!("processed: {}/{}", report.succeeded(), report.total())
}

fn preview_table(records: &[RankingRecord], styled: bool) -> Option<String> {
    if records.is_empty() {
        return None;
    }
    let mut table = new_table(styled);
    table.set_header(vec![
        header_cell("#"),
        header_cell("score"),
        header_cell("num"),
        header_cell("accumulate"),
    ]);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (index, record) in records.iter().take(PREVIEW_RECORDS).enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&record.score),
            Cell::new(record.num),
            Cell::new(record.accumulate),
        ]);
    }
    Some(table.to_string())
}

fn new_table(styled: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
    if styled {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }
    table
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn key_cell(key: &str) -> Cell {
    Cell::new(key).fg(Color::Blue).add_attribute(Attribute::Bold)
}

fn finish(lines: Vec<String>) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}
