//! tabjson CLI.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tabjson_cli::env::load_env_file;
use tabjson_cli::logging::{LogConfig, LogFormat, init_logging};
use tabjson_cli::summary::{render_cities, render_inspect, render_processed, render_ranking};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_cities, run_inspect, run_rankings};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    if let Err(error) = load_env_file(&cli.env_file) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
    let styled = stdout_styled(&cli);
    let exit_code = match &cli.command {
        Command::Cities(args) => match run_cities(args) {
            Ok(run) => {
                print!("{}", render_cities(&run, styled));
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Ranking(args) => match run_rankings(args) {
            Ok(report) => {
                for (category, run) in &report.runs {
                    match run {
                        Ok(run) => print!("{}", render_ranking(run, styled)),
                        Err(error) => eprintln!("error: {category}: {error:#}"),
                    }
                    println!();
                }
                println!("{}", render_processed(&report));
                if report.has_errors() { 1 } else { 0 }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Inspect(args) => match run_inspect(args) {
            Ok(run) => {
                print!("{}", render_inspect(&run, styled));
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let mut config = LogConfig::default()
        .with_level(level_filter)
        .with_format(format)
        .with_log_file(cli.log_file.clone());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

/// Whether summary tables on stdout should carry colors.
fn stdout_styled(cli: &Cli) -> bool {
    match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stdout().is_terminal(),
    }
}
