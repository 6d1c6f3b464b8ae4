//! Rendering of console summaries.

use std::path::PathBuf;

use tabjson_cli::paths::Category;
use tabjson_cli::summary::{
    render_catalog, render_inspect, render_outcome, render_processed, render_ranking,
    render_table,
};
use tabjson_cli::types::{InspectRun, RankingReport, RankingRun};
use tabjson_model::{CanonicalResult, CellValue, GroupedCatalog, RankingRecord, RankingTable};
use tabjson_transform::{Threshold, project_and_filter};

fn large_catalog() -> GroupedCatalog {
    let mut catalog = GroupedCatalog::new();
    for index in 0..13 {
        catalog.insert("Hubei", format!("city{index:02}"));
    }
    for (key, count) in [("Henan", 3), ("Hunan", 2), ("Anhui", 2), ("Jiangxi", 1), ("Tibet", 1)] {
        for index in 0..count {
            catalog.insert(key, format!("{key}-{index}"));
        }
    }
    catalog
}

#[test]
fn catalog_summary_lists_counts_top_groups_and_sample() {
    let text = render_catalog(&large_catalog(), false);

    assert!(text.starts_with("groups: 6\nmembers: 22\n"));
    assert!(text.contains("top groups by member count (first 5):"));
    assert!(text.contains("Hubei"));
    assert!(text.contains("Jiangxi"));
    assert!(!text.contains("Tibet"));
    assert!(text.contains("sample: Hubei\n  - city00\n"));
    assert!(text.contains("  - city09\n"));
    assert!(!text.contains("city10"));
    assert!(text.ends_with("  ... and 3 more\n"));
}

#[test]
fn empty_results_render_zero_counts() {
    insta::assert_snapshot!(render_catalog(&GroupedCatalog::new(), false), @r"
    groups: 0
    members: 0
    ");
    insta::assert_snapshot!(render_table(&RankingTable::default(), false), @"records: 0");
}

#[test]
fn outcome_summary_counts_filtered_records() {
    let rows: Vec<Vec<CellValue>> = [
        ("121", "2", "2"),
        ("120", "5", "7"),
        ("119", "3", "10"),
        ("700-750", "1", "11"),
    ]
    .iter()
    .map(|(s, n, a)| vec![CellValue::from(*s), CellValue::from(*n), CellValue::from(*a)])
    .collect();
    let outcome = project_and_filter(&rows, &[0, 1, 2], Some(Threshold::new(120.0))).unwrap();

    let text = render_outcome(&outcome, false);

    assert!(text.starts_with(
        "input records: 4\nkept: 2\nfiltered out: 2 (below threshold: 1, unparsable: 1)\n"
    ));
    assert!(text.contains("preview (first 5):"));
    assert!(text.contains("accumulate"));
}

#[test]
fn ranking_summary_names_threshold() {
    let run = RankingRun {
        category: Category::History,
        input: PathBuf::from("in.xlsx"),
        output: PathBuf::from("out.json"),
        threshold: Some(Threshold::new(120.0)),
        outcome: Default::default(),
    };
    let text = render_ranking(&run, false);
    assert!(text.starts_with("== history ==\ninput: in.xlsx\noutput: out.json\nthreshold: >= 120\n"));
}

#[test]
fn preview_is_limited_to_five_records() {
    let table = RankingTable::new(
        (0..8)
            .map(|i| RankingRecord::new(format!("{}", 700 - i), 1, i + 1))
            .collect(),
    );
    let text = render_table(&table, false);
    assert!(text.starts_with("records: 8\n"));
    assert!(text.contains("696"));
    assert!(!text.contains("695"));
}

#[test]
fn inspect_summary_reports_shape() {
    let run = InspectRun {
        path: PathBuf::from("province_city.json"),
        result: CanonicalResult::from(GroupedCatalog::new()),
    };
    insta::assert_snapshot!(render_inspect(&run, false), @r"
    artifact: province_city.json
    shape: grouped
    groups: 0
    members: 0
    ");
}

#[test]
fn processed_line_counts_successes() {
    let report = RankingReport {
        runs: vec![
            (Category::Physics, Err(anyhow::anyhow!("missing file"))),
            (
                Category::History,
                Ok(RankingRun {
                    category: Category::History,
                    input: PathBuf::from("in.xlsx"),
                    output: PathBuf::from("out.json"),
                    threshold: None,
                    outcome: Default::default(),
                }),
            ),
        ],
    };
    assert_eq!(render_processed(&report), "processed: 1/2");
    assert!(report.has_errors());
}
