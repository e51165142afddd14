//! Command-line interface for the roadtour route planner.
//!
//! Every subcommand loads one road network, from a network JSON file or from
//! a city catalogue, and prints its result as pretty JSON. Route results
//! with `error` or `partial_success` status are printed like any other
//! result; only failures to run the command are reported as errors.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use env_logger::{Builder, Target};
use log::LevelFilter;
use serde::Serialize;

mod error;
mod network;
mod neighbours;
mod route;

pub use error::CliError;

use neighbours::{NeighboursArgs, SampleArgs, run_neighbours, run_sample};
use route::{CompareArgs, RouteArgs, run_compare, run_route};

pub(crate) const ARG_REQUEST: &str = "request";
pub(crate) const ARG_NETWORK: &str = "network";
pub(crate) const ARG_CITY: &str = "city";
pub(crate) const ARG_CITIES: &str = "cities";
pub(crate) const ARG_SPEED: &str = "speed-kmh";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_ALGORITHMS: &str = "algorithms";
pub(crate) const ARG_ALGORITHM: &str = "algorithm";
pub(crate) const ARG_NODE: &str = "node";
pub(crate) const ARG_COUNT: &str = "count";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ARG_TRUCKS: &str = "trucks";
pub(crate) const ENV_ROUTE_REQUEST: &str = "ROADTOUR_CMDS_ROUTE_REQUEST_PATH";
pub(crate) const ENV_ROUTE_CITIES: &str = "ROADTOUR_CMDS_ROUTE_CITIES";
pub(crate) const ENV_COMPARE_REQUEST: &str = "ROADTOUR_CMDS_COMPARE_REQUEST_PATH";
pub(crate) const ENV_COMPARE_CITIES: &str = "ROADTOUR_CMDS_COMPARE_CITIES";
pub(crate) const ENV_NEIGHBOURS_NODE: &str = "ROADTOUR_CMDS_NEIGHBOURS_NODE";
pub(crate) const ENV_NEIGHBOURS_CITIES: &str = "ROADTOUR_CMDS_NEIGHBOURS_CITIES";
pub(crate) const ENV_SAMPLE_CITIES: &str = "ROADTOUR_CMDS_SAMPLE_CITIES";

/// Run the roadtour CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] when arguments or configuration are invalid, when
/// inputs cannot be read, or when output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging(cli.verbose);
    match cli.command {
        Command::Route(args) => run_route(args),
        Command::Compare(args) => run_compare(args),
        Command::Neighbours(args) => run_neighbours(args),
        Command::Sample(args) => run_sample(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "roadtour",
    about = "Plan tours and truck routes over road networks",
    version
)]
struct Cli {
    /// Log planning progress at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a route for a JSON request.
    Route(RouteArgs),
    /// Compare tour algorithms on one request.
    Compare(CompareArgs),
    /// List the neighbours of a node.
    Neighbours(NeighboursArgs),
    /// Draw random stops as a request.
    Sample(SampleArgs),
}

/// Log to stderr, honouring `RUST_LOG` over the default level.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut builder = Builder::new();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    // A logger may already be installed when embedded or under test.
    if builder.target(Target::Stderr).try_init().is_err() {
        log::debug!("logger already initialised");
    }
}

/// Write `value` as pretty JSON to `output`, or to `writer` when no output
/// path is set.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    output: Option<&Utf8Path>,
    value: &T,
) -> Result<(), CliError> {
    let mut payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    payload.push('\n');
    output
        .map_or_else(
            || writer.write_all(payload.as_bytes()),
            |path| roadtour_fs::write_utf8(path, &payload),
        )
        .map_err(CliError::WriteOutput)
}

#[cfg(test)]
mod tests;
