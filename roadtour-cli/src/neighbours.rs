//! `neighbours` and `sample` command implementations.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use roadtour::{Algorithm, Neighbour, NodeId, RouteRequest};
use serde::{Deserialize, Serialize};

use crate::network::NetworkSource;
use crate::{
    ARG_ALGORITHM, ARG_CITIES, ARG_CITY, ARG_COUNT, ARG_NETWORK, ARG_NODE, ARG_SEED, ARG_TRUCKS,
    CliError, ENV_NEIGHBOURS_CITIES, ENV_NEIGHBOURS_NODE, ENV_SAMPLE_CITIES, write_json,
};

const DEFAULT_SAMPLE_SIZE: usize = 10;

/// CLI arguments for the `neighbours` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(about = "List the outgoing neighbours of a road-network node")]
#[ortho_config(prefix = "ROADTOUR")]
pub(crate) struct NeighboursArgs {
    /// Node whose neighbours are listed.
    #[arg(long = ARG_NODE, value_name = "id")]
    #[serde(default)]
    pub(crate) node: Option<NodeId>,
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
}

impl NeighboursArgs {
    pub(crate) fn into_config(self) -> Result<NeighboursConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        NeighboursConfig::try_from(merged)
    }
}

/// Resolved `neighbours` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NeighboursConfig {
    pub(crate) node: NodeId,
    pub(crate) source: NetworkSource,
}

impl TryFrom<NeighboursArgs> for NeighboursConfig {
    type Error = CliError;

    fn try_from(args: NeighboursArgs) -> Result<Self, Self::Error> {
        let node = args.node.ok_or(CliError::MissingArgument {
            field: ARG_NODE,
            env: ENV_NEIGHBOURS_NODE,
        })?;
        let source =
            NetworkSource::resolve(args.network, args.city, args.cities, ENV_NEIGHBOURS_CITIES)?;
        Ok(Self { node, source })
    }
}

pub(crate) fn run_neighbours(args: NeighboursArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_neighbours_with(args, &mut stdout)
}

pub(crate) fn run_neighbours_with(
    args: NeighboursArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.source.validate()?;
    let neighbours = list_neighbours(&config)?;
    write_json(writer, None, &neighbours)
}

pub(crate) fn list_neighbours(config: &NeighboursConfig) -> Result<Vec<Neighbour>, CliError> {
    let store = config.source.open_store()?;
    let network = store.current()?;
    if !network.contains(config.node) {
        return Err(CliError::UnknownNode(config.node));
    }
    let neighbours = network.neighbours(config.node);
    debug!("node {} has {} neighbours", config.node, neighbours.len());
    Ok(neighbours)
}

/// CLI arguments for the `sample` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Draw distinct random nodes from a road network and print \
                 them as a route request, ready for the route or compare \
                 commands.",
    about = "Draw random stops as a route request"
)]
#[ortho_config(prefix = "ROADTOUR")]
pub(crate) struct SampleArgs {
    /// Number of stops to draw.
    #[arg(long = ARG_COUNT, value_name = "n")]
    #[serde(default)]
    pub(crate) count: Option<usize>,
    /// Seed for the draw, also written into the request.
    #[arg(long = ARG_SEED, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Algorithm recorded in the request.
    #[arg(long = ARG_ALGORITHM, value_name = "name")]
    #[serde(default)]
    pub(crate) algorithm: Option<String>,
    /// Number of trucks recorded in the request.
    #[arg(long = ARG_TRUCKS, value_name = "n")]
    #[serde(default)]
    pub(crate) trucks: Option<usize>,
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
}

impl SampleArgs {
    pub(crate) fn into_config(self) -> Result<SampleConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SampleConfig::try_from(merged)
    }
}

/// Resolved `sample` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SampleConfig {
    pub(crate) count: usize,
    pub(crate) seed: u64,
    pub(crate) algorithm: Algorithm,
    pub(crate) trucks: usize,
    pub(crate) source: NetworkSource,
}

impl TryFrom<SampleArgs> for SampleConfig {
    type Error = CliError;

    fn try_from(args: SampleArgs) -> Result<Self, Self::Error> {
        let algorithm = match args.algorithm.as_deref() {
            Some(name) => name.parse().map_err(CliError::InvalidAlgorithm)?,
            None => Algorithm::Approximate,
        };
        let source =
            NetworkSource::resolve(args.network, args.city, args.cities, ENV_SAMPLE_CITIES)?;
        Ok(Self {
            count: args.count.unwrap_or(DEFAULT_SAMPLE_SIZE),
            seed: args.seed.unwrap_or_default(),
            algorithm,
            trucks: args.trucks.unwrap_or(1),
            source,
        })
    }
}

pub(crate) fn run_sample(args: SampleArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_sample_with(args, &mut stdout)
}

pub(crate) fn run_sample_with(args: SampleArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.source.validate()?;
    let request = sample_request(&config)?;
    write_json(writer, None, &request)
}

pub(crate) fn sample_request(config: &SampleConfig) -> Result<RouteRequest, CliError> {
    let store = config.source.open_store()?;
    let network = store.current()?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let node_ids = network
        .sample_stops(config.count, &mut rng)
        .map_err(CliError::Sample)?;
    Ok(RouteRequest {
        node_ids,
        algorithm: config.algorithm.name().to_owned(),
        num_trucks: config.trucks,
        seed: config.seed,
    })
}
