//! Road-network documents, the city catalogue and network source selection.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use log::debug;
use roadtour::{EdgeData, NetworkError, NetworkStore, NodeId, RoadNetwork};
use serde::{Deserialize, Serialize};

use crate::{ARG_CITIES, ARG_NETWORK, CliError};

/// JSON description of a road network.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub(crate) struct NetworkDocument {
    pub(crate) nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub(crate) edges: Vec<EdgeRecord>,
}

/// A node entry of a [`NetworkDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct NodeRecord {
    pub(crate) id: NodeId,
    pub(crate) lat: f64,
    pub(crate) lon: f64,
}

/// An edge entry of a [`NetworkDocument`].
///
/// `geometry` lists `[longitude, latitude]` pairs. Two-way edges add the
/// reverse edge with the polyline reversed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct EdgeRecord {
    pub(crate) from: NodeId,
    pub(crate) to: NodeId,
    pub(crate) length: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) geometry: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    pub(crate) two_way: bool,
}

impl EdgeRecord {
    fn data(&self) -> EdgeData {
        self.geometry.as_ref().map_or_else(
            || EdgeData::straight(self.length),
            |points| {
                EdgeData::with_geometry(
                    self.length,
                    points.iter().map(|&[x, y]| Coord { x, y }).collect(),
                )
            },
        )
    }
}

impl NetworkDocument {
    /// Build the road network described by the document.
    pub(crate) fn into_network(self) -> Result<RoadNetwork, NetworkError> {
        let mut builder = RoadNetwork::builder();
        for node in &self.nodes {
            builder.add_node(node.id, node.lat, node.lon)?;
        }
        for edge in &self.edges {
            let data = edge.data();
            if edge.two_way {
                builder.add_two_way(edge.from, edge.to, data)?;
            } else {
                builder.add_edge(edge.from, edge.to, data)?;
            }
        }
        Ok(builder.build())
    }
}

/// Parse and build a network document from `contents` read at `path`.
pub(crate) fn parse_network(path: &Utf8Path, contents: &str) -> Result<RoadNetwork, CliError> {
    let document: NetworkDocument =
        serde_json::from_str(contents).map_err(|source| CliError::ParseInput {
            what: "road network",
            path: path.to_path_buf(),
            source,
        })?;
    let network = document
        .into_network()
        .map_err(|source| CliError::InvalidNetwork {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        "read {} nodes and {} edges from {path}",
        network.node_count(),
        network.edge_count()
    );
    Ok(network)
}

/// City names mapped to network files beside the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CityCatalogue {
    dir: Utf8PathBuf,
    entries: BTreeMap<String, String>,
}

impl CityCatalogue {
    /// Catalogue whose files live in `dir`.
    pub(crate) const fn new(dir: Utf8PathBuf, entries: BTreeMap<String, String>) -> Self {
        Self { dir, entries }
    }

    /// Read a JSON catalogue of the form `{"City": "file.json"}`.
    pub(crate) fn load(path: &Utf8Path) -> Result<Self, CliError> {
        let contents = roadtour_fs::read_utf8(path).map_err(|source| CliError::ReadInput {
            path: path.to_path_buf(),
            source,
        })?;
        let entries = serde_json::from_str(&contents).map_err(|source| CliError::ParseInput {
            what: "city catalogue",
            path: path.to_path_buf(),
            source,
        })?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };
        Ok(Self::new(dir, entries))
    }

    /// Network filename registered for `city`.
    ///
    /// Blank names and names containing `..` or a path separator are
    /// rejected.
    pub(crate) fn file_for(&self, city: &str) -> Result<&str, CliError> {
        let file = self
            .entries
            .get(city)
            .ok_or_else(|| CliError::UnknownCity {
                city: city.to_owned(),
            })?;
        if file.trim().is_empty() || file.contains("..") || file.contains(['/', '\\']) {
            return Err(CliError::UnsafeCityFile {
                city: city.to_owned(),
                file: file.clone(),
            });
        }
        Ok(file)
    }

    /// Read and build the network of `city`.
    pub(crate) fn read_network(&self, city: &str) -> Result<RoadNetwork, CliError> {
        let file = self.file_for(city)?;
        let path = self.dir.join(file);
        let contents =
            roadtour_fs::read_in_dir(&self.dir, file).map_err(|source| CliError::ReadInput {
                path: path.clone(),
                source,
            })?;
        parse_network(&path, &contents)
    }

    /// Registered city names in lexical order.
    pub(crate) fn cities(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }
}

/// Where a command takes its road network from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NetworkSource {
    /// A network document on disk.
    File(Utf8PathBuf),
    /// A city listed in a catalogue.
    City {
        /// Catalogue file.
        catalogue: Utf8PathBuf,
        /// City name.
        city: String,
    },
}

impl NetworkSource {
    /// Pick the source from the merged `--network`, `--city` and `--cities`
    /// values.
    pub(crate) fn resolve(
        network: Option<Utf8PathBuf>,
        city: Option<String>,
        cities: Option<Utf8PathBuf>,
        cities_env: &'static str,
    ) -> Result<Self, CliError> {
        match (network, city) {
            (Some(_), Some(_)) => Err(CliError::ConflictingNetworkSource),
            (Some(path), None) => Ok(Self::File(path)),
            (None, Some(name)) => {
                let catalogue = cities.ok_or(CliError::MissingArgument {
                    field: ARG_CITIES,
                    env: cities_env,
                })?;
                Ok(Self::City {
                    catalogue,
                    city: name,
                })
            }
            (None, None) => Err(CliError::MissingNetworkSource),
        }
    }

    /// Check that the referenced file exists.
    pub(crate) fn validate(&self) -> Result<(), CliError> {
        match self {
            Self::File(path) => require_existing(path, ARG_NETWORK),
            Self::City { catalogue, .. } => require_existing(catalogue, ARG_CITIES),
        }
    }

    /// Name the network is cached under.
    pub(crate) fn label(&self) -> &str {
        match self {
            Self::File(path) => path.as_str(),
            Self::City { city, .. } => city,
        }
    }

    /// Load the network into a fresh store and make it the active one.
    pub(crate) fn open_store(&self) -> Result<NetworkStore, CliError> {
        let store = NetworkStore::new();
        store.load_with(self.label(), || self.read_network())?;
        Ok(store)
    }

    fn read_network(&self) -> Result<RoadNetwork, CliError> {
        match self {
            Self::File(path) => {
                let contents =
                    roadtour_fs::read_utf8(path).map_err(|source| CliError::ReadInput {
                        path: path.clone(),
                        source,
                    })?;
                parse_network(path, &contents)
            }
            Self::City { catalogue, city } => {
                let cities = CityCatalogue::load(catalogue)?;
                debug!(
                    "catalogue lists {}",
                    cities.cities().collect::<Vec<_>>().join(", ")
                );
                cities.read_network(city)
            }
        }
    }
}

/// Check that `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match roadtour_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}
