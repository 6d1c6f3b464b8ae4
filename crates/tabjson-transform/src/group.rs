//! Grouping rows into a key → members catalog.

use tracing::{debug, info};

use tabjson_model::{CellValue, GroupedCatalog, Row};

/// Builds a [`GroupedCatalog`] from `key_column` and `member_column` of each row.
///
/// A row is skipped when its key is missing or blank after trimming, or when
/// its member cell is a missing or blank scalar. A list member cell adds each
/// non-blank element; an empty list still registers the key. Keys and members
/// are trimmed. Rows too short to hold either column are skipped.
pub fn group(rows: &[Row], key_column: usize, member_column: usize) -> GroupedCatalog {
    let mut catalog = GroupedCatalog::new();
    let mut skipped = 0usize;

    for (index, row) in rows.iter().enumerate() {
        let Some(key) = row.get(key_column).and_then(key_text) else {
            debug!(row = index, "skipping row without a group key");
            skipped += 1;
            continue;
        };
        let member_cell = row.get(member_column).unwrap_or(&CellValue::Null);
        if member_cell.is_blank() {
            debug!(row = index, key = %key, "skipping row without members");
            skipped += 1;
            continue;
        }

        let members = catalog.touch(key);
        for member in member_cell.members() {
            let member = member.trim();
            if !member.is_empty() {
                members.insert(member.to_string());
            }
        }
    }

    info!(
        rows = rows.len(),
        groups = catalog.group_count(),
        members = catalog.member_count(),
        skipped,
        "grouped rows"
    );
    catalog
}

fn key_text(cell: &CellValue) -> Option<String> {
    let text = cell.to_text()?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
