//! Small deterministic road networks used by unit, property and behaviour
//! tests across the workspace.

use geo::LineString;

use crate::network::{EdgeData, NetworkError, NodeId, RoadNetwork, RoadNetworkBuilder};
use crate::reduced::ReducedGraph;

fn finish(
    build: impl FnOnce(&mut RoadNetworkBuilder) -> Result<(), NetworkError>,
) -> RoadNetwork {
    let mut builder = RoadNetwork::builder();
    match build(&mut builder) {
        Ok(()) => builder.build(),
        Err(err) => panic!("test network is invalid: {err}"),
    }
}

/// Three mutually reachable nodes `1`, `2`, `3` with two-way edges
/// `1-2 = 100`, `2-3 = 100` and `1-3 = 150`.
#[must_use]
pub fn triangle_network() -> RoadNetwork {
    finish(|b| {
        b.add_node(1, 50.0, 4.0)?
            .add_node(2, 50.0009, 4.0)?
            .add_node(3, 50.0009, 4.0013)?
            .add_two_way(1, 2, EdgeData::straight(100.0))?
            .add_two_way(2, 3, EdgeData::straight(100.0))?
            .add_two_way(1, 3, EdgeData::straight(150.0))?;
        Ok(())
    })
}

/// Two components, `{1, 2}` and `{3, 4}`, with no path between them.
#[must_use]
pub fn disconnected_network() -> RoadNetwork {
    finish(|b| {
        b.add_node(1, 50.0, 4.0)?
            .add_node(2, 50.001, 4.0)?
            .add_node(3, 51.0, 5.0)?
            .add_node(4, 51.001, 5.0)?
            .add_two_way(1, 2, EdgeData::straight(110.0))?
            .add_two_way(3, 4, EdgeData::straight(110.0))?;
        Ok(())
    })
}

/// Nodes `1` and `2` joined by two parallel `1 -> 2` edges: the first is
/// `60` long and carries a three-point polyline, the second is `40` long.
/// A single `2 -> 1` edge of length `50` has no geometry.
#[must_use]
pub fn parallel_edge_network() -> RoadNetwork {
    let line = LineString::from(vec![(4.0, 50.0), (4.0004, 50.0003), (4.0008, 50.0005)]);
    finish(|b| {
        b.add_node(1, 50.0, 4.0)?
            .add_node(2, 50.0005, 4.0008)?
            .add_edge(1, 2, EdgeData::with_geometry(60.0, line))?
            .add_edge(1, 2, EdgeData::straight(40.0))?
            .add_edge(2, 1, EdgeData::straight(50.0))?;
        Ok(())
    })
}

/// Identifier of the grid node at `(row, col)` in [`grid_network`].
#[must_use]
pub fn grid_node(cols: u64, row: u64, col: u64) -> NodeId {
    row * cols + col + 1
}

/// A `rows x cols` lattice of two-way streets `spacing` metres apart.
///
/// Node identifiers follow [`grid_node`]; rows grow northwards and columns
/// eastwards from `(50.0, 4.0)` in steps of `0.001` degrees.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "grid coordinates are derived from small integer offsets"
)]
pub fn grid_network(rows: u64, cols: u64, spacing: f64) -> RoadNetwork {
    finish(|b| {
        for row in 0..rows {
            for col in 0..cols {
                b.add_node(
                    grid_node(cols, row, col),
                    50.0 + row as f64 * 0.001,
                    4.0 + col as f64 * 0.001,
                )?;
            }
        }
        for row in 0..rows {
            for col in 0..cols {
                let here = grid_node(cols, row, col);
                if col + 1 < cols {
                    b.add_two_way(here, grid_node(cols, row, col + 1), EdgeData::straight(spacing))?;
                }
                if row + 1 < rows {
                    b.add_two_way(here, grid_node(cols, row + 1, col), EdgeData::straight(spacing))?;
                }
            }
        }
        Ok(())
    })
}

/// Build a reduced graph over stops `0..n` from a literal weight matrix.
///
/// # Panics
///
/// Panics if the matrix is not square or holds invalid weights.
#[must_use]
pub fn reduced_from_matrix(weights: Vec<Vec<f64>>) -> ReducedGraph {
    let stops = (0..weights.len() as u64).collect();
    match ReducedGraph::from_matrix(stops, weights) {
        Ok(graph) => graph,
        Err(err) => panic!("test matrix is invalid: {err}"),
    }
}

/// Euclidean reduced graph over points on the plane, stops numbered `0..n`.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "euclidean weights are computed from coordinates"
)]
pub fn euclidean_reduced(points: &[(f64, f64)]) -> ReducedGraph {
    let weights = points
        .iter()
        .map(|&(ax, ay)| {
            points
                .iter()
                .map(|&(bx, by)| (ax - bx).hypot(ay - by))
                .collect()
        })
        .collect();
    reduced_from_matrix(weights)
}
