//! Directed road network over real-world intersections.
//!
//! A [`RoadNetwork`] is immutable once built. Nodes carry WGS84 positions
//! stored as [`Coord`] values (`x = longitude`, `y = latitude`); edges carry a
//! non-negative length in metres and an optional polyline in the same
//! (longitude, latitude) order. Several parallel edges may connect the same
//! pair of nodes; attribute lookups always resolve to the first one added.

use std::collections::HashMap;

use geo::{Coord, LineString};
use rand::Rng;
use rand::seq::index;
use thiserror::Error;

/// Identifier of a road-network node.
pub type NodeId = u64;

/// A `[latitude, longitude]` pair as rendered to callers.
pub type LatLon = [f64; 2];

/// An intersection or way vertex in the road network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Geospatial position (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
}

impl Node {
    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.location.x
    }

    /// Position as a `[latitude, longitude]` pair.
    #[must_use]
    pub const fn lat_lon(&self) -> LatLon {
        [self.location.y, self.location.x]
    }
}

/// Attributes attached to a directed edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeData {
    /// Physical length in metres.
    pub length: f64,
    /// Optional polyline in (longitude, latitude) order.
    pub geometry: Option<LineString<f64>>,
}

impl EdgeData {
    /// Edge without stored geometry.
    #[must_use]
    pub const fn straight(length: f64) -> Self {
        Self {
            length,
            geometry: None,
        }
    }

    /// Edge with an explicit polyline.
    #[must_use]
    pub const fn with_geometry(length: f64, geometry: LineString<f64>) -> Self {
        Self {
            length,
            geometry: Some(geometry),
        }
    }
}

/// An outgoing neighbour of a node, as listed by [`RoadNetwork::neighbours`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighbour {
    /// Neighbour node identifier.
    pub id: NodeId,
    /// Neighbour latitude.
    pub lat: f64,
    /// Neighbour longitude.
    pub lon: f64,
    /// Length of the first edge leading to the neighbour.
    pub distance: f64,
}

/// Errors raised while building or sampling a [`RoadNetwork`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    /// A node identifier was added twice.
    #[error("node {0} already exists")]
    DuplicateNode(NodeId),
    /// An edge referenced a node that was never added.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    /// An edge length was negative or not finite.
    #[error("edge {from}->{to} has invalid length {length}")]
    InvalidLength {
        /// Edge source.
        from: NodeId,
        /// Edge target.
        to: NodeId,
        /// Offending length.
        length: f64,
    },
    /// More stops were requested than the network holds.
    #[error("requested {requested} nodes but the network only has {available}")]
    NotEnoughNodes {
        /// Number of nodes requested.
        requested: usize,
        /// Number of nodes available.
        available: usize,
    },
}

#[derive(Debug, Clone)]
struct Edge {
    target: usize,
    data: EdgeData,
}

/// Immutable directed road network.
///
/// # Examples
///
/// ```rust
/// use roadtour_core::{EdgeData, RoadNetwork};
///
/// # fn main() -> Result<(), roadtour_core::NetworkError> {
/// let mut builder = RoadNetwork::builder();
/// builder
///     .add_node(1, 50.0, 4.0)?
///     .add_node(2, 50.001, 4.0)?
///     .add_edge(1, 2, EdgeData::straight(111.0))?;
/// let network = builder.build();
///
/// assert_eq!(network.node_count(), 2);
/// assert_eq!(network.coordinates(2), Some([50.001, 4.0]));
/// assert!(network.edge_data(2, 1).is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    outgoing: Vec<Vec<Edge>>,
    edge_count: usize,
}

impl RoadNetwork {
    /// Start building a network.
    #[must_use]
    pub fn builder() -> RoadNetworkBuilder {
        RoadNetworkBuilder::default()
    }

    /// Number of nodes.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges, parallel edges included.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether `id` names a node of this network.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Look up a node by identifier.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).and_then(|idx| self.nodes.get(idx))
    }

    /// Position of `id` as `[latitude, longitude]`.
    #[must_use]
    pub fn coordinates(&self, id: NodeId) -> Option<LatLon> {
        self.node(id).map(Node::lat_lon)
    }

    /// Attributes of the first edge from `from` to `to`.
    #[must_use]
    pub fn edge_data(&self, from: NodeId, to: NodeId) -> Option<&EdgeData> {
        let source = self.index_of(from)?;
        let target = self.index_of(to)?;
        self.outgoing
            .get(source)?
            .iter()
            .find(|edge| edge.target == target)
            .map(|edge| &edge.data)
    }

    /// List the distinct outgoing neighbours of `id` in insertion order.
    ///
    /// Returns an empty list for unknown nodes.
    #[must_use]
    pub fn neighbours(&self, id: NodeId) -> Vec<Neighbour> {
        let Some(edges) = self.index_of(id).and_then(|idx| self.outgoing.get(idx)) else {
            return Vec::new();
        };
        let mut seen = Vec::new();
        let mut neighbours = Vec::new();
        for edge in edges {
            if seen.contains(&edge.target) {
                continue;
            }
            seen.push(edge.target);
            if let Some(node) = self.nodes.get(edge.target) {
                neighbours.push(Neighbour {
                    id: node.id,
                    lat: node.lat(),
                    lon: node.lon(),
                    distance: edge.data.length,
                });
            }
        }
        neighbours
    }

    /// Pick `count` distinct node identifiers uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::NotEnoughNodes`] when `count` exceeds the node
    /// count.
    pub fn sample_stops<R>(&self, count: usize, rng: &mut R) -> Result<Vec<NodeId>, NetworkError>
    where
        R: Rng + ?Sized,
    {
        if count > self.nodes.len() {
            return Err(NetworkError::NotEnoughNodes {
                requested: count,
                available: self.nodes.len(),
            });
        }
        Ok(index::sample(rng, self.nodes.len(), count)
            .into_iter()
            .filter_map(|idx| self.nodes.get(idx).map(|node| node.id))
            .collect())
    }

    /// Iterate over every node in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    pub(crate) fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub(crate) fn node_at(&self, idx: usize) -> Option<&Node> {
        self.nodes.get(idx)
    }

    /// Outgoing `(target index, length)` pairs of the node at `idx`.
    pub(crate) fn outgoing_lengths(&self, idx: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.outgoing
            .get(idx)
            .into_iter()
            .flatten()
            .map(|edge| (edge.target, edge.data.length))
    }
}

/// Incremental builder for [`RoadNetwork`].
#[derive(Debug, Default)]
pub struct RoadNetworkBuilder {
    network: RoadNetwork,
}

impl RoadNetworkBuilder {
    /// Add a node at the given latitude and longitude.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::DuplicateNode`] if `id` was already added.
    pub fn add_node(&mut self, id: NodeId, lat: f64, lon: f64) -> Result<&mut Self, NetworkError> {
        if self.network.index.contains_key(&id) {
            return Err(NetworkError::DuplicateNode(id));
        }
        self.network.index.insert(id, self.network.nodes.len());
        self.network.nodes.push(Node {
            id,
            location: Coord { x: lon, y: lat },
        });
        self.network.outgoing.push(Vec::new());
        Ok(self)
    }

    /// Add a directed edge between two existing nodes.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::UnknownNode`] for missing endpoints and
    /// [`NetworkError::InvalidLength`] for negative or non-finite lengths.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        data: EdgeData,
    ) -> Result<&mut Self, NetworkError> {
        if !data.length.is_finite() || data.length < 0.0 {
            return Err(NetworkError::InvalidLength {
                from,
                to,
                length: data.length,
            });
        }
        let source = self
            .network
            .index_of(from)
            .ok_or(NetworkError::UnknownNode(from))?;
        let target = self
            .network
            .index_of(to)
            .ok_or(NetworkError::UnknownNode(to))?;
        let edges = self
            .network
            .outgoing
            .get_mut(source)
            .ok_or(NetworkError::UnknownNode(from))?;
        edges.push(Edge { target, data });
        self.network.edge_count += 1;
        Ok(self)
    }

    /// Add edges in both directions with the same length and mirrored
    /// geometry.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Self::add_edge`].
    pub fn add_two_way(
        &mut self,
        a: NodeId,
        b: NodeId,
        data: EdgeData,
    ) -> Result<&mut Self, NetworkError> {
        let reverse = EdgeData {
            length: data.length,
            geometry: data.geometry.as_ref().map(|line| {
                let mut coords = line.0.clone();
                coords.reverse();
                LineString::new(coords)
            }),
        };
        self.add_edge(a, b, data)?;
        self.add_edge(b, a, reverse)
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> RoadNetwork {
        self.network
    }
}
