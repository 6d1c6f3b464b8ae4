//! End-to-end normalization scenarios.

use serde_json::json;
use tabjson_model::{CanonicalResult, CellValue, Row};
use tabjson_transform::{Threshold, TransformError, group, project_and_filter};

fn text_row(cells: &[&str]) -> Row {
    cells.iter().map(|c| CellValue::from(*c)).collect()
}

fn members(items: &[&str]) -> CellValue {
    CellValue::List(items.iter().map(|s| (*s).to_string()).collect())
}

#[test]
fn threshold_keeps_scores_at_or_above_minimum() {
    let rows = vec![
        text_row(&["120", "5", "5"]),
        text_row(&["119", "3", "8"]),
        text_row(&["121", "2", "10"]),
    ];

    let outcome = project_and_filter(&rows, &[0, 1, 2], Some(Threshold::new(120.0))).unwrap();

    assert_eq!(outcome.input_count, 3);
    assert_eq!(outcome.kept(), 2);
    assert_eq!(outcome.below_threshold_count(), 1);
    assert_eq!(outcome.dropped[0].row, 1);
    assert_eq!(
        serde_json::to_value(CanonicalResult::from(outcome.table)).unwrap(),
        json!({"data": [
            {"score": "120", "num": 5, "accumulate": 5},
            {"score": "121", "num": 2, "accumulate": 10}
        ]})
    );
}

#[test]
fn group_collapses_duplicates_and_drops_blank_keys() {
    let rows = vec![
        vec![CellValue::from("Hubei"), members(&["Wuhan", "Wuhan", "Yichang"])],
        vec![CellValue::from(""), members(&["X"])],
        vec![CellValue::from("Henan"), members(&[])],
    ];

    let catalog = group(&rows, 0, 1);

    assert_eq!(
        serde_json::to_value(CanonicalResult::from(catalog)).unwrap(),
        json!({"Hubei": ["Wuhan", "Yichang"], "Henan": []})
    );
}

#[test]
fn whitespace_key_is_excluded_even_with_members() {
    let rows = vec![
        vec![CellValue::from("   "), members(&["Wuhan"])],
        vec![CellValue::Null, members(&["Yichang"])],
    ];
    assert!(group(&rows, 0, 1).is_empty());
}

#[test]
fn grouping_is_byte_identical_across_runs() {
    let rows = vec![
        vec![CellValue::from("湖北"), members(&["宜昌", "武汉"])],
        vec![CellValue::from("河南"), members(&["郑州"])],
        vec![CellValue::from("湖北"), members(&["武汉", "襄阳"])],
    ];
    let first = serde_json::to_string(&group(&rows, 0, 1)).unwrap();
    let second = serde_json::to_string(&group(&rows, 0, 1)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn selection_must_name_three_columns() {
    let rows = vec![text_row(&["120", "5", "5", "extra"])];
    let err = project_and_filter(&rows, &[0, 1, 2, 3], None).unwrap_err();
    assert!(matches!(
        err,
        TransformError::SelectionArity {
            expected: 3,
            actual: 4,
            ..
        }
    ));
}
