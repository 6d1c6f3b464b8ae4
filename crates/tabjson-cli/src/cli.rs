//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use tabjson_cli::paths::{Category, Province};
use tabjson_model::Shape;

#[derive(Parser)]
#[command(
    name = "tabjson",
    version,
    about = "Extract tabular exam and region data into JSON artifacts",
    long_about = "Extract tabular exam and region data into JSON artifacts.\n\n\
                  Reads ClickHouse query results, spreadsheets, or delimited text,\n\
                  normalizes them into a grouped catalog or a ranking table, and\n\
                  writes UTF-8 JSON for the presentation layer."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Environment file loaded before reading connection settings.
    ///
    /// Variables already set in the process environment take precedence.
    #[arg(long = "env-file", value_name = "PATH", default_value = ".env", global = true)]
    pub env_file: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Query ClickHouse for provinces and their cities.
    Cities(CitiesArgs),

    /// Convert published score ranking tables.
    Ranking(RankingArgs),

    /// Read a written artifact back and summarize it.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct CitiesArgs {
    /// Directory for province_city.json.
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// ClickHouse host (overrides CLICKHOUSE_HOST).
    #[arg(long = "host")]
    pub host: Option<String>,

    /// ClickHouse HTTP port (overrides CLICKHOUSE_PORT).
    #[arg(long = "port")]
    pub port: Option<u16>,

    /// ClickHouse user (overrides CLICKHOUSE_USER).
    #[arg(long = "user")]
    pub user: Option<String>,

    /// ClickHouse database (overrides CLICKHOUSE_DATABASE).
    #[arg(long = "database")]
    pub database: Option<String>,
}

#[derive(Parser)]
pub struct RankingArgs {
    /// Province of the published tables.
    #[arg(long = "province", value_enum, default_value = "hubei")]
    pub province: Province,

    /// Category to process; repeat for several (default: physics and history).
    #[arg(long = "category", value_enum)]
    pub categories: Vec<Category>,

    /// Exam year, used in the input file name.
    #[arg(long = "year", default_value_t = 2025)]
    pub year: u16,

    /// Directory holding downloaded tables (default: the user's downloads folder).
    #[arg(long = "downloads-dir", value_name = "DIR")]
    pub downloads_dir: Option<PathBuf>,

    /// Explicit input file; only valid with a single category.
    #[arg(long = "input", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Field delimiter for delimited text input.
    #[arg(long = "delimiter", value_enum, default_value = "tab")]
    pub delimiter: DelimiterArg,

    /// Drop records whose score is below this value or not numeric.
    #[arg(long = "min-score", value_name = "N")]
    pub min_score: Option<f64>,

    /// Directory for ranking_score_<province>_<category>.json.
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Artifact to read.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Structure of the artifact (detected when omitted).
    ///
    /// Needed for a grouped catalog whose only group is `data` with no
    /// members, which otherwise reads as an empty ranking table.
    #[arg(long = "shape", value_enum)]
    pub shape: Option<ShapeArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ShapeArg {
    Flat,
    Grouped,
}

impl From<ShapeArg> for Shape {
    fn from(value: ShapeArg) -> Self {
        match value {
            ShapeArg::Flat => Self::Flat,
            ShapeArg::Grouped => Self::Grouped,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DelimiterArg {
    Tab,
    Comma,
    Semicolon,
}

impl DelimiterArg {
    pub fn byte(self) -> u8 {
        match self {
            Self::Tab => b'\t',
            Self::Comma => b',',
            Self::Semicolon => b';',
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ranking_accepts_repeated_categories() {
        let cli = Cli::parse_from([
            "tabjson",
            "ranking",
            "--category",
            "physics",
            "--category",
            "history",
            "--min-score",
            "120",
        ]);
        let Command::Ranking(args) = cli.command else {
            panic!("expected ranking command");
        };
        assert_eq!(args.categories, vec![Category::Physics, Category::History]);
        assert_eq!(args.min_score, Some(120.0));
        assert_eq!(args.year, 2025);
        assert_eq!(args.delimiter.byte(), b'\t');
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from(["tabjson", "inspect", "out.json", "--log-format", "json"]);
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert_eq!(cli.env_file, PathBuf::from(".env"));
    }

    #[test]
    fn inspect_accepts_shape() {
        let cli = Cli::parse_from(["tabjson", "inspect", "groups.json", "--shape", "grouped"]);
        let Command::Inspect(args) = cli.command else {
            panic!("expected inspect command");
        };
        assert_eq!(args.shape.map(Shape::from), Some(Shape::Grouped));
    }
}
