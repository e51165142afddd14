//! Complete distance graph over the stops of one request.
//!
//! Vertex `i` of a [`ReducedGraph`] is the `i`-th stop of the request and the
//! weight of `(i, j)` is the road-network shortest-path length from stop `i`
//! to stop `j`. Weights are computed per direction and need not be
//! symmetric. The graph is built fresh for every request.

use log::debug;
use thiserror::Error;

use crate::error::{Rejection, RouteError, RoutingFailure};
use crate::network::NodeId;
use crate::oracle::ShortestPathOracle;

/// A weight matrix did not match its stop list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("distance matrix must be {expected}x{expected} with finite, non-negative weights")]
pub struct InvalidMatrix {
    /// Number of stops the matrix should cover.
    pub expected: usize,
}

/// Fully connected weighted graph among a request's stops.
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedGraph {
    stops: Vec<NodeId>,
    weights: Vec<Vec<f64>>,
}

impl ReducedGraph {
    /// Query `oracle` for every ordered pair of distinct stops.
    ///
    /// Pairs are visited source by source in stop order; the first
    /// unreachable pair aborts the build.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::TooFewStops`] for fewer than two stops and a
    /// [`RoutingFailure::NoPath`] partial failure naming the first
    /// unreachable pair.
    pub fn build<O>(oracle: &O, stops: &[NodeId]) -> Result<Self, RouteError>
    where
        O: ShortestPathOracle + ?Sized,
    {
        if stops.len() < 2 {
            return Err(Rejection::TooFewStops.into());
        }
        let mut weights = Vec::with_capacity(stops.len());
        for &from in stops {
            let row = oracle.distances_from(from, stops);
            let mut resolved = Vec::with_capacity(stops.len());
            for (&to, reached) in stops.iter().zip(row) {
                if from == to {
                    resolved.push(0.0);
                    continue;
                }
                let Some(distance) = reached else {
                    return Err(RouteError::from(RoutingFailure::NoPath { from, to })
                        .with_ordered_points(stops));
                };
                resolved.push(distance);
            }
            weights.push(resolved);
        }
        debug!("built reduced graph over {} stops", stops.len());
        Ok(Self {
            stops: stops.to_vec(),
            weights,
        })
    }

    /// Wrap a precomputed weight matrix.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMatrix`] if the matrix is not `n x n` for `n` stops or
    /// holds negative or non-finite weights.
    pub fn from_matrix(stops: Vec<NodeId>, weights: Vec<Vec<f64>>) -> Result<Self, InvalidMatrix> {
        let expected = stops.len();
        let valid = weights.len() == expected
            && weights.iter().all(|row| {
                row.len() == expected && row.iter().all(|w| w.is_finite() && *w >= 0.0)
            });
        if !valid {
            return Err(InvalidMatrix { expected });
        }
        Ok(Self { stops, weights })
    }

    /// Number of stops.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the graph has no stops.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stops in request order.
    #[must_use]
    pub fn stops(&self) -> &[NodeId] {
        &self.stops
    }

    /// Vertex index of `stop`.
    #[must_use]
    pub fn index_of(&self, stop: NodeId) -> Option<usize> {
        self.stops.iter().position(|&candidate| candidate == stop)
    }

    /// Weight of the directed edge `from -> to`.
    ///
    /// Out-of-range indices yield infinity so that they never win a
    /// comparison.
    #[must_use]
    pub fn weight(&self, from: usize, to: usize) -> f64 {
        self.weights
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    /// Weight of the undirected simplification: the cheaper direction.
    #[must_use]
    pub fn undirected_weight(&self, a: usize, b: usize) -> f64 {
        self.weight(a, b).min(self.weight(b, a))
    }

    /// Sum of consecutive edge weights along `order`.
    #[must_use]
    pub fn path_length(&self, order: &[usize]) -> f64 {
        order
            .windows(2)
            .map(|pair| match pair {
                [from, to] => self.weight(*from, *to),
                _ => 0.0,
            })
            .sum()
    }

    /// Length of `order` closed back to its first vertex.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "cycle length adds the closing edge to the path length"
    )]
    pub fn cycle_length(&self, order: &[usize]) -> f64 {
        match (order.first(), order.last()) {
            (Some(&first), Some(&last)) => self.path_length(order) + self.weight(last, first),
            _ => 0.0,
        }
    }

    /// Map vertex indices back to stop identifiers.
    #[must_use]
    pub fn to_stops(&self, order: &[usize]) -> Vec<NodeId> {
        order
            .iter()
            .filter_map(|&idx| self.stops.get(idx).copied())
            .collect()
    }
}
