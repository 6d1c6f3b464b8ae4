use anyhow::{Context, Result};
use tracing::info_span;

use tabjson_cli::pipeline::{
    CITIES_ARITY, CITIES_QUERY, RankingPlan, run_cities as cities_pipeline,
    run_rankings as ranking_pipeline,
};
use tabjson_cli::types::{CitiesRun, InspectRun, RankingReport};
use tabjson_ingest::{ClickHouseConfig, ClickHouseSource};
use tabjson_output::{read_json, read_json_as};

use crate::cli::{CitiesArgs, InspectArgs, RankingArgs};

pub fn run_cities(args: &CitiesArgs) -> Result<CitiesRun> {
    let span = info_span!("cities");
    let _guard = span.enter();
    let config = clickhouse_config(args)?;
    let mut source = ClickHouseSource::connect(config, CITIES_QUERY)
        .context("connect to ClickHouse")?
        .with_expected_arity(CITIES_ARITY);
    cities_pipeline(&mut source, &args.output_dir)
}

fn clickhouse_config(args: &CitiesArgs) -> Result<ClickHouseConfig> {
    let mut config = ClickHouseConfig::from_env().context("read ClickHouse settings")?;
    if let Some(host) = &args.host {
        config.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(user) = &args.user {
        config.username.clone_from(user);
    }
    if let Some(database) = &args.database {
        config.database.clone_from(database);
    }
    Ok(config.normalized())
}

/// Converts every requested category, continuing past failures.
pub fn run_rankings(args: &RankingArgs) -> Result<RankingReport> {
    ranking_pipeline(&RankingPlan {
        province: args.province,
        categories: args.categories.clone(),
        year: args.year,
        downloads_dir: args.downloads_dir.clone(),
        input: args.input.clone(),
        delimiter: args.delimiter.byte(),
        min_score: args.min_score,
        output_dir: args.output_dir.clone(),
    })
}

pub fn run_inspect(args: &InspectArgs) -> Result<InspectRun> {
    let result = match args.shape {
        Some(shape) => read_json_as(&args.path, shape.into())?,
        None => read_json(&args.path)?,
    };
    Ok(InspectRun {
        path: args.path.clone(),
        result,
    })
}
