//! Source → normalization → sink runs shared by the commands.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use tabjson_ingest::{ColumnSelection, TabularSource, open_file_source};
use tabjson_model::CanonicalResult;
use tabjson_output::write_json;
use tabjson_transform::{Threshold, group, project_and_filter};

use crate::paths::{
    CITIES_FILE_NAME, Category, Province, default_downloads_dir, ranking_input_name,
    ranking_output_name,
};
use crate::types::{CitiesRun, RankingReport, RankingRun};

/// Distinct cities per province, one row per province.
pub const CITIES_QUERY: &str = "\
SELECT
    school_province,
    groupArray(DISTINCT school_city) AS cities
FROM gaokao2025
WHERE school_province IS NOT NULL
  AND school_province != ''
  AND school_city IS NOT NULL
  AND school_city != ''
GROUP BY school_province
ORDER BY school_province";

/// Columns of the cities query result.
pub const CITIES_ARITY: usize = 2;

/// Score, count and cumulative count are the first three sheet columns.
pub const RANKING_COLUMNS: [usize; 3] = [0, 1, 2];

/// Groups the province rows of `source` and writes `province_city.json`.
pub fn run_cities<S>(source: &mut S, output_dir: &Path) -> Result<CitiesRun>
where
    S: TabularSource + ?Sized,
{
    let started = Instant::now();
    let description = source.describe();
    let rows = source
        .fetch()
        .with_context(|| format!("read {description}"))?;
    let catalog = group(&rows.rows, 0, 1);
    let output = write_json(
        &CanonicalResult::from(catalog.clone()),
        output_dir.join(CITIES_FILE_NAME),
    )?;
    info!(
        groups = catalog.group_count(),
        duration_ms = started.elapsed().as_millis(),
        "cities complete"
    );
    Ok(CitiesRun {
        source: description,
        catalog,
        output,
    })
}

/// Everything needed to convert one category's table.
#[derive(Debug, Clone)]
pub struct RankingRequest {
    pub category: Category,
    pub input: PathBuf,
    pub output: PathBuf,
    pub delimiter: u8,
    pub threshold: Option<Threshold>,
}

/// Opens the request's input by extension and converts it.
pub fn run_ranking(request: &RankingRequest) -> Result<RankingRun> {
    let span = info_span!("ranking", category = %request.category);
    let _guard = span.enter();
    let selection = ColumnSelection::first(RANKING_COLUMNS.len()).with_text_column(0);
    let mut source = open_file_source(request.input.clone(), selection, request.delimiter)
        .with_context(|| format!("open {}", request.input.display()))?;
    run_ranking_from(&mut source, request)
}

/// Projects the rows of `source` and writes the ranking artifact.
pub fn run_ranking_from<S>(source: &mut S, request: &RankingRequest) -> Result<RankingRun>
where
    S: TabularSource + ?Sized,
{
    let started = Instant::now();
    let rows = source
        .fetch()
        .with_context(|| format!("read {}", source.describe()))?;
    let outcome = project_and_filter(&rows.rows, &RANKING_COLUMNS, request.threshold)?;
    let output = write_json(
        &CanonicalResult::from(outcome.table.clone()),
        &request.output,
    )?;
    info!(
        kept = outcome.kept(),
        dropped = outcome.dropped_count(),
        duration_ms = started.elapsed().as_millis(),
        "ranking complete"
    );
    Ok(RankingRun {
        category: request.category,
        input: request.input.clone(),
        output,
        threshold: request.threshold,
        outcome,
    })
}

/// A ranking conversion over one or more categories.
#[derive(Debug, Clone)]
pub struct RankingPlan {
    pub province: Province,
    /// Empty means every category.
    pub categories: Vec<Category>,
    pub year: u16,
    /// Where published tables are looked up; the user's downloads folder when unset.
    pub downloads_dir: Option<PathBuf>,
    /// Explicit input, only valid for a single category.
    pub input: Option<PathBuf>,
    pub delimiter: u8,
    pub min_score: Option<f64>,
    pub output_dir: PathBuf,
}

impl RankingPlan {
    /// Resolves the plan into one request per category, in order.
    ///
    /// A category whose input cannot be located carries its error in place of
    /// a request.
    pub fn requests(&self) -> Result<Vec<(Category, Result<RankingRequest>)>> {
        let categories = if self.categories.is_empty() {
            Category::ALL.to_vec()
        } else {
            self.categories.clone()
        };
        if self.input.is_some() && categories.len() != 1 {
            bail!("--input needs exactly one --category");
        }
        let threshold = match self.min_score {
            Some(minimum) if !minimum.is_finite() => bail!("--min-score must be a finite number"),
            Some(minimum) => Some(Threshold::new(minimum)),
            None => None,
        };

        Ok(categories
            .into_iter()
            .map(|category| {
                let request = self.input_for(category).map(|input| RankingRequest {
                    category,
                    input,
                    output: self
                        .output_dir
                        .join(ranking_output_name(self.province, category)),
                    delimiter: self.delimiter,
                    threshold,
                });
                (category, request)
            })
            .collect())
    }

    fn input_for(&self, category: Category) -> Result<PathBuf> {
        if let Some(input) = &self.input {
            return Ok(input.clone());
        }
        let downloads = match &self.downloads_dir {
            Some(dir) => dir.clone(),
            None => default_downloads_dir()
                .context("cannot determine the downloads directory; pass --downloads-dir")?,
        };
        Ok(downloads.join(ranking_input_name(self.year, self.province, category)))
    }
}

/// Converts every category of `plan`, continuing past failures.
///
/// Only an invalid plan is an error; per-category failures are recorded in
/// the report.
pub fn run_rankings(plan: &RankingPlan) -> Result<RankingReport> {
    let mut report = RankingReport::default();
    for (category, request) in plan.requests()? {
        let result = request.and_then(|request| run_ranking(&request));
        if let Err(error) = &result {
            warn!(category = %category, "ranking failed: {error:#}");
        }
        report.runs.push((category, result));
    }
    Ok(report)
}
