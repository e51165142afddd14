//! Facade crate for the roadtour route planner.
//!
//! This crate re-exports the core domain types and hosts the request planner
//! that validates a [`RouteRequest`], reduces its stops to a complete distance
//! graph, runs the selected tour heuristic or the Clarke & Wright fleet
//! planner, and renders the result. [`compare_algorithms`] runs several
//! heuristics over the same stops for side-by-side evaluation.

#![forbid(unsafe_code)]

mod compare;
mod planner;

pub use compare::{BatchPolicy, Comparison, ComparisonRun, SkippedRun, compare_algorithms};
pub use planner::{Plan, PlannerConfig, RoutePlanner, RouteRequest, compute_route};

pub use roadtour_core::{
    Algorithm, DijkstraOracle, EdgeData, LatLon, Neighbour, NetworkError, NetworkSnapshot,
    NetworkStore, NodeId, Rejection, RoadNetwork, RoadNetworkBuilder, RouteError, RouteResult,
    RouteStatus, RoutingFailure, ShortestPathOracle, StoreError, TravelModel, VehicleRoute,
};
pub use roadtour_solver_tsp::{AnnealingSchedule, TourSolvers};
pub use roadtour_solver_vrp::{ClarkeWright, FleetPlan};
