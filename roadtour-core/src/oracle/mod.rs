//! Point-to-point shortest-path queries over a road network.
//!
//! The [`ShortestPathOracle`] trait abstracts the routing engine used to
//! build reduced graphs and to materialise full node paths for rendering.
//! Unreachable pairs are a regular outcome, reported as `None`, which callers
//! must branch on. Distances are not assumed to be symmetric.

mod dijkstra;

pub use dijkstra::DijkstraOracle;

use crate::network::NodeId;

/// Shortest-path queries weighted by physical edge length.
///
/// # Examples
///
/// ```rust
/// use roadtour_core::{DijkstraOracle, EdgeData, RoadNetwork, ShortestPathOracle};
///
/// # fn main() -> Result<(), roadtour_core::NetworkError> {
/// let mut builder = RoadNetwork::builder();
/// builder
///     .add_node(1, 0.0, 0.0)?
///     .add_node(2, 0.0, 0.001)?
///     .add_node(3, 0.0, 0.002)?
///     .add_edge(1, 2, EdgeData::straight(100.0))?
///     .add_edge(2, 3, EdgeData::straight(100.0))?;
/// let network = builder.build();
/// let oracle = DijkstraOracle::new(&network);
///
/// assert_eq!(oracle.distance(1, 3), Some(200.0));
/// assert_eq!(oracle.path(1, 3), Some(vec![1, 2, 3]));
/// assert_eq!(oracle.distance(3, 1), None);
/// # Ok(())
/// # }
/// ```
pub trait ShortestPathOracle {
    /// Length of the shortest path from `from` to `to`, or `None` when `to`
    /// cannot be reached.
    fn distance(&self, from: NodeId, to: NodeId) -> Option<f64>;

    /// Node sequence of the shortest path, both endpoints included, or
    /// `None` when `to` cannot be reached.
    fn path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>>;

    /// Distances from one source to many targets, in target order.
    ///
    /// Implementations backed by single-source searches should override this
    /// to answer every target from one search.
    fn distances_from(&self, from: NodeId, targets: &[NodeId]) -> Vec<Option<f64>> {
        targets.iter().map(|&to| self.distance(from, to)).collect()
    }
}
