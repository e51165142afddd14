//! `route` and `compare` command implementations.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roadtour::{
    Algorithm, BatchPolicy, Comparison, PlannerConfig, RoutePlanner, RouteRequest, RouteResult,
    TravelModel, compare_algorithms,
};
use serde::{Deserialize, Serialize};

use crate::network::{NetworkSource, require_existing};
use crate::{
    ARG_ALGORITHMS, ARG_CITIES, ARG_CITY, ARG_NETWORK, ARG_OUTPUT, ARG_REQUEST, ARG_SPEED,
    CliError, ENV_COMPARE_CITIES, ENV_COMPARE_REQUEST, ENV_ROUTE_CITIES, ENV_ROUTE_REQUEST,
    write_json,
};

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan a route over a road network. The request is a JSON \
                 file holding node_ids, algorithm, num_trucks and seed; the \
                 network comes from a JSON network file or from a city \
                 catalogue.",
    about = "Plan a tour or a fleet of truck routes"
)]
#[ortho_config(prefix = "ROADTOUR")]
pub(crate) struct RouteArgs {
    /// Path to a JSON file containing a route request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Road network JSON file.
    #[arg(long = ARG_NETWORK, value_name = "path")]
    #[serde(default)]
    pub(crate) network: Option<Utf8PathBuf>,
    /// City to load from the catalogue.
    #[arg(long = ARG_CITY, value_name = "name")]
    #[serde(default)]
    pub(crate) city: Option<String>,
    /// City catalogue JSON file.
    #[arg(long = ARG_CITIES, value_name = "path")]
    #[serde(default)]
    pub(crate) cities: Option<Utf8PathBuf>,
    /// Average speed used for travel time estimates.
    #[arg(long = ARG_SPEED, value_name = "km/h")]
    #[serde(default)]
    pub(crate) speed_kmh: Option<f64>,
    /// Write the result here instead of standard output.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl RouteArgs {
    pub(crate) fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

/// Resolved `route` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RouteConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) source: NetworkSource,
    pub(crate) planner: PlannerConfig,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl RouteConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_REQUEST)?;
        self.source.validate()
    }
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_ROUTE_REQUEST,
        })?;
        let source = NetworkSource::resolve(args.network, args.city, args.cities, ENV_ROUTE_CITIES)?;
        let planner = PlannerConfig {
            travel: travel_model(args.speed_kmh)?,
            ..PlannerConfig::default()
        };
        Ok(Self {
            request_path,
            source,
            planner,
            output: args.output,
        })
    }
}

fn travel_model(speed_kmh: Option<f64>) -> Result<TravelModel, CliError> {
    match speed_kmh {
        None => Ok(TravelModel::default()),
        Some(value) if value.is_finite() && value > 0.0 => Ok(TravelModel {
            average_speed_kmh: value,
        }),
        Some(value) => Err(CliError::InvalidSpeed {
            field: ARG_SPEED,
            value,
        }),
    }
}

pub(crate) fn run_route(args: RouteArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_route_with(args, &mut stdout)
}

pub(crate) fn run_route_with(args: RouteArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let result = execute_route(&config)?;
    write_json(writer, config.output.as_deref(), &result)
}

pub(crate) fn execute_route(config: &RouteConfig) -> Result<RouteResult, CliError> {
    let request = load_route_request(&config.request_path)?;
    let store = config.source.open_store()?;
    let planner = RoutePlanner::with_config(config.planner);
    let result = planner.compute_on(&store, &request);
    info!(
        "{} route over {} stops finished with status {:?}",
        request.algorithm,
        request.node_ids.len(),
        result.status
    );
    Ok(result)
}

/// Loads a JSON-encoded [`RouteRequest`] from disk.
pub(crate) fn load_route_request(path: &Utf8Path) -> Result<RouteRequest, CliError> {
    let contents = roadtour_fs::read_utf8(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::ParseInput {
        what: "route request",
        path: path.to_path_buf(),
        source,
    })
}

/// CLI arguments for the `compare` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Run several tour algorithms over the stops of one request \
                 and report distance, travel time, compute time and the \
                 ratio to the best result for each.",
    about = "Compare tour algorithms on one set of stops"
)]
#[ortho_config(prefix = "ROADTOUR")]
pub(crate) struct CompareArgs {
    /// Path to a JSON file containing a route request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Road network JSON file.
    #[arg(long = ARG_NETWORK, value_name = "path")]
    #[serde(default)]
    pub(crate) network: Option<Utf8PathBuf>,
    /// City to load from the catalogue.
    #[arg(long = ARG_CITY, value_name = "name")]
    #[serde(default)]
    pub(crate) city: Option<String>,
    /// City catalogue JSON file.
    #[arg(long = ARG_CITIES, value_name = "path")]
    #[serde(default)]
    pub(crate) cities: Option<Utf8PathBuf>,
    /// Comma-separated algorithm names; every tour algorithm when omitted.
    #[arg(long = ARG_ALGORITHMS, value_name = "names")]
    #[serde(default)]
    pub(crate) algorithms: Option<String>,
    /// Average speed used for travel time estimates.
    #[arg(long = ARG_SPEED, value_name = "km/h")]
    #[serde(default)]
    pub(crate) speed_kmh: Option<f64>,
    /// Write the comparison here instead of standard output.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl CompareArgs {
    pub(crate) fn into_config(self) -> Result<CompareConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CompareConfig::try_from(merged)
    }
}

/// Resolved `compare` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompareConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) source: NetworkSource,
    pub(crate) algorithms: Vec<Algorithm>,
    pub(crate) planner: PlannerConfig,
    pub(crate) policy: BatchPolicy,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<CompareArgs> for CompareConfig {
    type Error = CliError;

    fn try_from(args: CompareArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_COMPARE_REQUEST,
        })?;
        let source =
            NetworkSource::resolve(args.network, args.city, args.cities, ENV_COMPARE_CITIES)?;
        let algorithms = match args.algorithms.as_deref() {
            Some(list) => parse_algorithms(list)?,
            None => Algorithm::TOURS.to_vec(),
        };
        let planner = PlannerConfig {
            travel: travel_model(args.speed_kmh)?,
            ..PlannerConfig::default()
        };
        Ok(Self {
            request_path,
            source,
            algorithms,
            planner,
            policy: BatchPolicy::default(),
            output: args.output,
        })
    }
}

/// Parse a comma-separated algorithm list, skipping empty entries.
pub(crate) fn parse_algorithms(list: &str) -> Result<Vec<Algorithm>, CliError> {
    list.split(',')
        .filter(|name| !name.trim().is_empty())
        .map(|name| name.parse().map_err(CliError::InvalidAlgorithm))
        .collect()
}

pub(crate) fn run_compare(args: CompareArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_compare_with(args, &mut stdout)
}

pub(crate) fn run_compare_with(args: CompareArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.request_path, ARG_REQUEST)?;
    config.source.validate()?;
    let comparison = execute_compare(&config)?;
    write_json(writer, config.output.as_deref(), &comparison)
}

pub(crate) fn execute_compare(config: &CompareConfig) -> Result<Comparison, CliError> {
    let request = load_route_request(&config.request_path)?;
    let store = config.source.open_store()?;
    let snapshot = store.current()?;
    let planner = RoutePlanner::with_config(config.planner);
    compare_algorithms(
        &planner,
        &snapshot,
        &request.node_ids,
        &config.algorithms,
        request.seed,
        &config.policy,
    )
    .map_err(CliError::Comparison)
}
