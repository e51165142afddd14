//! Render legs of a route as polylines.
//!
//! A leg is an ordered list of stops. Consecutive stops are joined with their
//! shortest road path; the stitched node sequence is then converted to
//! coordinates using each edge's stored polyline, or its endpoint positions
//! when none is stored.

use geo::Coord;

use crate::error::RoutingFailure;
use crate::network::{LatLon, NodeId, RoadNetwork};
use crate::oracle::ShortestPathOracle;

/// One rendered leg.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leg {
    /// Every road-network node traversed, in order.
    pub nodes: Vec<NodeId>,
    /// Polyline as `[latitude, longitude]` pairs without consecutive
    /// duplicates.
    pub coordinates: Vec<LatLon>,
    /// Summed length of the traversed edges in metres.
    pub distance: f64,
}

/// Stitch shortest paths between consecutive `stops` into a full node
/// sequence.
///
/// Each path contributes every node but its last; the final stop is
/// appended once at the end.
///
/// # Errors
///
/// Returns [`RoutingFailure::NoPath`] for the first consecutive pair without
/// a path.
pub fn stitch_paths<O>(oracle: &O, stops: &[NodeId]) -> Result<Vec<NodeId>, RoutingFailure>
where
    O: ShortestPathOracle + ?Sized,
{
    let mut nodes = Vec::new();
    for pair in stops.windows(2) {
        let [from, to] = *pair else { continue };
        let mut segment = oracle
            .path(from, to)
            .ok_or(RoutingFailure::NoPath { from, to })?;
        segment.pop();
        nodes.extend(segment);
    }
    if let Some(&last) = stops.last() {
        nodes.push(last);
    }
    Ok(nodes)
}

/// Render a leg through `stops`.
///
/// # Errors
///
/// Returns [`RoutingFailure::NoPath`] when consecutive stops are not
/// connected and [`RoutingFailure::MissingEdge`] when a traversed edge has no
/// attributes.
///
/// # Examples
///
/// ```rust
/// use geo::LineString;
/// use roadtour_core::{DijkstraOracle, EdgeData, RoadNetwork, build_leg};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let line = LineString::from(vec![(4.0, 50.0), (4.0005, 50.0002), (4.001, 50.0)]);
/// let mut builder = RoadNetwork::builder();
/// builder
///     .add_node(1, 50.0, 4.0)?
///     .add_node(2, 50.0, 4.001)?
///     .add_edge(1, 2, EdgeData::with_geometry(75.0, line))?;
/// let network = builder.build();
///
/// let leg = build_leg(&network, &DijkstraOracle::new(&network), &[1, 2])?;
/// assert_eq!(leg.coordinates, vec![[50.0, 4.0], [50.0002, 4.0005], [50.0, 4.001]]);
/// assert_eq!(leg.distance, 75.0);
/// # Ok(())
/// # }
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "leg distance sums floating-point edge lengths"
)]
pub fn build_leg<O>(network: &RoadNetwork, oracle: &O, stops: &[NodeId]) -> Result<Leg, RoutingFailure>
where
    O: ShortestPathOracle + ?Sized,
{
    let nodes = stitch_paths(oracle, stops)?;
    let mut coords: Vec<Coord<f64>> = Vec::new();
    let mut distance = 0.0;
    for pair in nodes.windows(2) {
        let [from, to] = *pair else { continue };
        let missing = RoutingFailure::MissingEdge { from, to };
        let data = network.edge_data(from, to).ok_or(missing)?;
        distance += data.length;
        if let Some(line) = &data.geometry {
            coords.extend(line.coords().copied());
        } else {
            let start = network.node(from).ok_or(missing)?;
            let end = network.node(to).ok_or(missing)?;
            coords.push(start.location);
            coords.push(end.location);
        }
    }
    coords.dedup();
    Ok(Leg {
        nodes,
        coordinates: coords.iter().map(|c| [c.y, c.x]).collect(),
        distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::DijkstraOracle;
    use crate::test_support::{
        disconnected_network, grid_network, grid_node, parallel_edge_network, triangle_network,
    };
    use rstest::rstest;

    #[rstest]
    fn single_edge_with_geometry_round_trips() {
        let network = parallel_edge_network();
        let oracle = DijkstraOracle::new(&network);
        let leg = build_leg(&network, &oracle, &[1, 2]).expect("connected");
        assert_eq!(
            leg.coordinates,
            vec![[50.0, 4.0], [50.0003, 4.0004], [50.0005, 4.0008]]
        );
        // The first parallel edge supplies the attributes.
        assert_eq!(leg.distance, 60.0);
        assert_eq!(leg.nodes, vec![1, 2]);
    }

    #[rstest]
    fn endpoints_are_used_without_geometry() {
        let network = triangle_network();
        let oracle = DijkstraOracle::new(&network);
        let leg = build_leg(&network, &oracle, &[1, 2, 3]).expect("connected");
        assert_eq!(leg.nodes, vec![1, 2, 3]);
        assert_eq!(
            leg.coordinates,
            vec![[50.0, 4.0], [50.0009, 4.0], [50.0009, 4.0013]]
        );
        assert_eq!(leg.distance, 200.0);
    }

    #[rstest]
    fn junction_nodes_are_not_repeated() {
        let network = grid_network(1, 4, 10.0);
        let oracle = DijkstraOracle::new(&network);
        let stops = [grid_node(4, 0, 0), grid_node(4, 0, 2), grid_node(4, 0, 3)];
        let leg = build_leg(&network, &oracle, &stops).expect("connected");
        assert_eq!(leg.nodes, vec![1, 2, 3, 4]);
        assert_eq!(leg.coordinates.len(), 4);
        assert!(leg.coordinates.windows(2).all(|w| w.first() != w.last()));
        assert_eq!(leg.distance, 30.0);
    }

    #[rstest]
    fn missing_path_names_the_pair() {
        let network = disconnected_network();
        let oracle = DijkstraOracle::new(&network);
        let err = build_leg(&network, &oracle, &[1, 2, 4]).expect_err("4 unreachable");
        assert_eq!(err, RoutingFailure::NoPath { from: 2, to: 4 });
    }

    struct TeleportOracle;

    impl ShortestPathOracle for TeleportOracle {
        fn distance(&self, _from: NodeId, _to: NodeId) -> Option<f64> {
            Some(1.0)
        }

        fn path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
            Some(vec![from, to])
        }
    }

    #[rstest]
    fn missing_edge_data_is_reported() {
        let network = disconnected_network();
        let err = build_leg(&network, &TeleportOracle, &[2, 3]).expect_err("no 2->3 edge");
        assert_eq!(err, RoutingFailure::MissingEdge { from: 2, to: 3 });
    }
}
