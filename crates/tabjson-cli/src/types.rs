use std::path::PathBuf;

use tabjson_model::{CanonicalResult, GroupedCatalog};
use tabjson_transform::{FilterOutcome, Threshold};

use crate::paths::Category;

#[derive(Debug)]
pub struct CitiesRun {
    pub source: String,
    pub catalog: GroupedCatalog,
    pub output: PathBuf,
}

#[derive(Debug)]
pub struct RankingRun {
    pub category: Category,
    pub input: PathBuf,
    pub output: PathBuf,
    pub threshold: Option<Threshold>,
    pub outcome: FilterOutcome,
}

/// One entry per requested category, in request order.
#[derive(Debug, Default)]
pub struct RankingReport {
    pub runs: Vec<(Category, anyhow::Result<RankingRun>)>,
}

impl RankingReport {
    pub fn total(&self) -> usize {
        self.runs.len()
    }

    pub fn succeeded(&self) -> usize {
        self.runs.iter().filter(|(_, run)| run.is_ok()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.succeeded() < self.total()
    }
}

#[derive(Debug)]
pub struct InspectRun {
    pub path: PathBuf,
    pub result: CanonicalResult,
}
