//! Core domain types for the roadtour route planner.
//!
//! The crate models a directed road network, answers shortest-path queries
//! over it, reduces a request's stops to a complete distance graph and turns
//! solved orderings back into rendered routes. Solvers plug in through the
//! [`TourSolver`] trait; the concrete heuristics live in sibling crates.
//!
//! Failures are explicit: invalid requests surface as [`Rejection`] and
//! unreachable node pairs as [`RoutingFailure`], both carried by
//! [`RouteError`] until they are folded into a [`RouteResult`].

#![forbid(unsafe_code)]

pub mod assemble;
pub mod error;
pub mod geometry;
pub mod network;
pub mod oracle;
pub mod reduced;
pub mod route;
pub mod solver;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use assemble::{assemble_fleet, assemble_tour};
pub use error::{PartialRoute, Rejection, RouteError, RoutingFailure};
pub use geometry::{Leg, build_leg, stitch_paths};
pub use network::{
    EdgeData, LatLon, Neighbour, NetworkError, Node, NodeId, RoadNetwork, RoadNetworkBuilder,
};
pub use oracle::{DijkstraOracle, ShortestPathOracle};
pub use reduced::{InvalidMatrix, ReducedGraph};
pub use route::{RouteResult, RouteStatus, TravelModel, VehicleRoute};
pub use solver::{Algorithm, SolverError, TourSolver, check_start, is_tour};
pub use store::{NetworkSnapshot, NetworkStore, StoreError};
