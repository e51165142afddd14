//! Error types emitted by the roadtour CLI.
//!
//! Route results with `error` or `partial_success` status are data and are
//! printed normally; only failures to run a command surface here.

use std::sync::Arc;

use camino::Utf8PathBuf;
use roadtour::{NetworkError, NodeId, Rejection, StoreError};
use thiserror::Error;

/// Errors emitted by the roadtour CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// Neither a network file nor a city was given.
    #[error("select a road network with --network or --city")]
    MissingNetworkSource,
    /// Both a network file and a city were given.
    #[error("--network and --city cannot be used together")]
    ConflictingNetworkSource,
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// The missing path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// The offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// The offending path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading an input document failed.
    #[error("failed to read {path:?}: {source}")]
    ReadInput {
        /// Document path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An input document is not valid JSON of the expected shape.
    #[error("failed to parse {what} JSON at {path:?}: {source}")]
    ParseInput {
        /// Kind of document.
        what: &'static str,
        /// Document path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// A network document describes an invalid network.
    #[error("invalid road network in {path:?}: {source}")]
    InvalidNetwork {
        /// Document path.
        path: Utf8PathBuf,
        /// Builder error.
        #[source]
        source: NetworkError,
    },
    /// The city is not listed in the catalogue.
    #[error("city {city:?} is not in the catalogue")]
    UnknownCity {
        /// Requested city.
        city: String,
    },
    /// A catalogue entry names a file outside the catalogue directory.
    #[error("invalid or unsafe network file {file:?} for city {city:?}")]
    UnsafeCityFile {
        /// City name.
        city: String,
        /// Offending filename.
        file: String,
    },
    /// The network store refused the request.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The average speed is not a positive finite number.
    #[error("--{field} must be a positive number of km/h, got {value}")]
    InvalidSpeed {
        /// Flag name.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// An algorithm name on the command line is not recognised.
    #[error("{0}")]
    InvalidAlgorithm(#[source] Rejection),
    /// The comparison was rejected before anything ran.
    #[error("comparison rejected: {0}")]
    Comparison(#[source] Rejection),
    /// The node is not part of the loaded network.
    #[error("node {0} is not in the road network")]
    UnknownNode(NodeId),
    /// Random stops could not be drawn.
    #[error("failed to sample stops: {0}")]
    Sample(#[source] NetworkError),
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
