//! Error taxonomy for route computations.
//!
//! Two outcomes other than success exist. A [`Rejection`] means the request
//! was invalid and nothing was computed. A [`RoutingFailure`] means two
//! required nodes could not be joined through the road network; the request
//! degrades to a partial result instead of failing outright.

use thiserror::Error;

use crate::network::{LatLon, NodeId};
use crate::solver::SolverError;

/// Input validation errors. Nothing is computed for a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Fewer than two stops were supplied.
    #[error("Select at least two points")]
    TooFewStops,
    /// The algorithm name is not recognised for this kind of request.
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),
    /// Simulated annealing was requested with too few stops.
    #[error("Simulated Annealing requires at least {required} points.")]
    TooFewStopsForAnnealing {
        /// Minimum number of stops.
        required: usize,
        /// Number of stops supplied.
        actual: usize,
    },
    /// A multi-vehicle request named an algorithm other than Clarke & Wright.
    #[error("Selected VRP algorithm not supported")]
    UnsupportedVrpAlgorithm,
    /// Zero vehicles were requested.
    #[error("Number of trucks must be at least 1")]
    NoTrucks,
    /// No road network is loaded.
    #[error("Graph not loaded")]
    NetworkNotLoaded,
    /// A stop does not exist in the road network.
    #[error("Unknown node {0}")]
    UnknownStop(NodeId),
    /// A stop appears twice in the request.
    #[error("Point {0} selected more than once")]
    DuplicateStop(NodeId),
    /// More stops were supplied than a batch comparison allows.
    #[error("Max {limit} points allowed.")]
    TooManyStops {
        /// Maximum number of stops.
        limit: usize,
    },
    /// The selected solver refused the reduced graph.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// A pair of nodes that could not be joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RoutingFailure {
    /// No path between two stops, or between consecutive tour stops.
    #[error("No path between {from} and {to}")]
    NoPath {
        /// Source node.
        from: NodeId,
        /// Target node.
        to: NodeId,
    },
    /// No path closing the tour from its last stop back to its first.
    #[error("No path from {from} back to {to}")]
    NoReturnPath {
        /// Last stop of the tour.
        from: NodeId,
        /// First stop of the tour.
        to: NodeId,
    },
    /// The depot cannot reach a client.
    #[error("No path from depot={depot} to {client}")]
    DepotUnreachable {
        /// Depot node.
        depot: NodeId,
        /// Client node.
        client: NodeId,
    },
    /// A client cannot get back to the depot.
    #[error("No path from {client} back to depot={depot}")]
    DepotReturnUnreachable {
        /// Depot node.
        depot: NodeId,
        /// Client node.
        client: NodeId,
    },
    /// Two clients cannot reach each other.
    #[error("No path between clients {from} and {to}")]
    ClientsUnreachable {
        /// Source client.
        from: NodeId,
        /// Target client.
        to: NodeId,
    },
    /// The topology links two nodes but no edge attributes were found.
    #[error("Edge data not found between {from} and {to}")]
    MissingEdge {
        /// Edge source.
        from: NodeId,
        /// Edge target.
        to: NodeId,
    },
    /// An edge on the closing leg of a tour has no attributes.
    #[error("Edge data not found in return path {from}-{to}")]
    MissingReturnEdge {
        /// Edge source.
        from: NodeId,
        /// Edge target.
        to: NodeId,
    },
}

/// A failed computation together with whatever was already meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialRoute {
    /// The pair that broke the computation.
    pub failure: RoutingFailure,
    /// Visiting order, if one was known when the failure happened.
    pub ordered_points: Vec<NodeId>,
    /// Main-leg geometry, if it was rendered before the failure.
    pub main_route_coordinates: Vec<LatLon>,
    /// Whether the failure happened while planning a fleet.
    pub fleet: bool,
}

/// Failure of a route computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// The request was invalid.
    #[error(transparent)]
    Rejected(#[from] Rejection),
    /// A required pair of nodes could not be joined.
    #[error("{}", .0.failure)]
    PartialFailure(Box<PartialRoute>),
}

impl RouteError {
    /// Attach the visiting order known at the point of failure.
    #[must_use]
    pub fn with_ordered_points(mut self, points: &[NodeId]) -> Self {
        if let Self::PartialFailure(partial) = &mut self {
            partial.ordered_points = points.to_vec();
        }
        self
    }

    /// Attach main-leg geometry rendered before the failure.
    #[must_use]
    pub fn with_main_route(mut self, coordinates: Vec<LatLon>) -> Self {
        if let Self::PartialFailure(partial) = &mut self {
            partial.main_route_coordinates = coordinates;
        }
        self
    }

    /// Mark a partial failure as belonging to a fleet plan.
    #[must_use]
    pub fn in_fleet(mut self) -> Self {
        if let Self::PartialFailure(partial) = &mut self {
            partial.fleet = true;
        }
        self
    }
}

impl From<RoutingFailure> for RouteError {
    fn from(failure: RoutingFailure) -> Self {
        Self::PartialFailure(Box::new(PartialRoute {
            failure,
            ordered_points: Vec::new(),
            main_route_coordinates: Vec::new(),
            fleet: false,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Rejection::TooFewStops, "Select at least two points")]
    #[case(
        Rejection::TooFewStopsForAnnealing { required: 5, actual: 3 },
        "Simulated Annealing requires at least 5 points."
    )]
    #[case(Rejection::UnsupportedVrpAlgorithm, "Selected VRP algorithm not supported")]
    #[case(Rejection::NetworkNotLoaded, "Graph not loaded")]
    fn rejection_messages(#[case] rejection: Rejection, #[case] expected: &str) {
        assert_eq!(rejection.to_string(), expected);
    }

    #[rstest]
    fn partial_failure_names_both_nodes() {
        let err = RouteError::from(RoutingFailure::NoPath { from: 11, to: 42 });
        assert_eq!(err.to_string(), "No path between 11 and 42");
    }

    #[rstest]
    fn partial_payload_is_attached() {
        let err = RouteError::from(RoutingFailure::NoReturnPath { from: 3, to: 1 })
            .with_ordered_points(&[1, 2, 3])
            .with_main_route(vec![[50.0, 4.0]]);
        let RouteError::PartialFailure(partial) = err else {
            panic!("expected a partial failure");
        };
        assert_eq!(partial.ordered_points, vec![1, 2, 3]);
        assert_eq!(partial.main_route_coordinates.len(), 1);
    }

    #[rstest]
    fn fleet_marker_only_touches_partial_failures() {
        let partial = RouteError::from(RoutingFailure::NoPath { from: 1, to: 2 }).in_fleet();
        let RouteError::PartialFailure(route) = partial else {
            panic!("expected a partial failure");
        };
        assert!(route.fleet);
        let rejected = RouteError::from(Rejection::NoTrucks).in_fleet();
        assert_eq!(rejected, RouteError::Rejected(Rejection::NoTrucks));
    }

    #[rstest]
    fn rejections_ignore_partial_payload() {
        let err = RouteError::from(Rejection::TooFewStops).with_ordered_points(&[1]);
        assert_eq!(err, RouteError::Rejected(Rejection::TooFewStops));
    }
}
