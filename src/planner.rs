//! Request validation and dispatch to the tour solvers or the fleet planner.

use std::collections::HashSet;

use log::{debug, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use roadtour_core::{
    Algorithm, DijkstraOracle, NetworkStore, NodeId, ReducedGraph, Rejection, RoadNetwork,
    RouteError, RouteResult, TravelModel, assemble_fleet, assemble_tour,
};
use roadtour_solver_tsp::{AnnealingSchedule, TourSolvers};
use roadtour_solver_vrp::ClarkeWright;

/// Parameters of one route computation.
///
/// The first stop is the tour start, or the depot when more than one truck
/// is requested. `algorithm` is kept as written so unknown names can be
/// reported back verbatim.
///
/// # Examples
/// ```rust
/// use roadtour::{Algorithm, RouteRequest};
///
/// let request = RouteRequest::tour(vec![1, 2, 3], Algorithm::TwoOpt).with_seed(7);
/// assert_eq!(request.algorithm, "two_opt");
/// assert_eq!(request.num_trucks, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteRequest {
    /// Stops to visit, start or depot first.
    pub node_ids: Vec<NodeId>,
    /// Algorithm name or display label.
    #[cfg_attr(feature = "serde", serde(default = "default_algorithm"))]
    pub algorithm: String,
    /// Number of vehicles; more than one selects fleet planning.
    #[cfg_attr(feature = "serde", serde(default = "default_trucks"))]
    pub num_trucks: usize,
    /// Seed for randomised solvers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: u64,
}

#[cfg(feature = "serde")]
fn default_algorithm() -> String {
    Algorithm::Approximate.name().to_owned()
}

#[cfg(feature = "serde")]
const fn default_trucks() -> usize {
    1
}

impl RouteRequest {
    /// A single-vehicle request.
    #[must_use]
    pub fn tour(node_ids: Vec<NodeId>, algorithm: Algorithm) -> Self {
        Self {
            node_ids,
            algorithm: algorithm.name().to_owned(),
            num_trucks: 1,
            seed: 0,
        }
    }

    /// A Clarke & Wright request for `num_trucks` vehicles.
    #[must_use]
    pub fn fleet(node_ids: Vec<NodeId>, num_trucks: usize) -> Self {
        Self {
            node_ids,
            algorithm: Algorithm::ClarkeWright.name().to_owned(),
            num_trucks,
            seed: 0,
        }
    }

    /// Replace the seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Tunables shared by every request handled by a [`RoutePlanner`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlannerConfig {
    /// Travel time estimate.
    #[cfg_attr(feature = "serde", serde(default))]
    pub travel: TravelModel,
    /// Simulated annealing schedule and minimum stop count.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub annealing: AnnealingSchedule,
}

/// What a validated request will run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// One vehicle, ordered by the given tour algorithm.
    Tour(Algorithm),
    /// Clarke & Wright savings over this many trucks.
    Fleet(usize),
}

/// Validates requests and runs them against a road network.
///
/// The planner holds no per-request state and may be shared between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutePlanner {
    config: PlannerConfig,
    solvers: TourSolvers,
}

impl RoutePlanner {
    /// A planner with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A planner using `config`.
    #[must_use]
    pub fn with_config(config: PlannerConfig) -> Self {
        Self {
            config,
            solvers: TourSolvers::with_schedule(config.annealing),
        }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Check a request against `network` without computing anything.
    ///
    /// Checks run in order: stop count, truck count, stop membership and
    /// uniqueness, algorithm choice, then the annealing minimum.
    ///
    /// # Errors
    ///
    /// Returns the first [`Rejection`] that applies.
    pub fn validate(
        &self,
        network: &RoadNetwork,
        request: &RouteRequest,
    ) -> Result<Plan, Rejection> {
        let stops = &request.node_ids;
        if stops.len() < 2 {
            return Err(Rejection::TooFewStops);
        }
        if request.num_trucks == 0 {
            return Err(Rejection::NoTrucks);
        }
        let mut seen = HashSet::with_capacity(stops.len());
        for &stop in stops {
            if !network.contains(stop) {
                return Err(Rejection::UnknownStop(stop));
            }
            if !seen.insert(stop) {
                return Err(Rejection::DuplicateStop(stop));
            }
        }

        if request.num_trucks > 1 {
            return match request.algorithm.parse::<Algorithm>() {
                Ok(algorithm) if algorithm.is_fleet() => Ok(Plan::Fleet(request.num_trucks)),
                _ => Err(Rejection::UnsupportedVrpAlgorithm),
            };
        }

        let algorithm = request.algorithm.parse::<Algorithm>()?;
        if algorithm.is_fleet() {
            return Err(Rejection::UnknownAlgorithm(request.algorithm.trim().to_owned()));
        }
        let required = self.config.annealing.min_stops;
        if algorithm == Algorithm::SimulatedAnnealing && stops.len() < required {
            return Err(Rejection::TooFewStopsForAnnealing {
                required,
                actual: stops.len(),
            });
        }
        Ok(Plan::Tour(algorithm))
    }

    /// Validate and run `request`, keeping failures as errors.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Rejected`] for invalid requests and
    /// [`RouteError::PartialFailure`] when two required nodes cannot be
    /// joined.
    pub fn plan(
        &self,
        network: &RoadNetwork,
        request: &RouteRequest,
    ) -> Result<RouteResult, RouteError> {
        let plan = self.validate(network, request)?;
        let oracle = DijkstraOracle::new(network);
        let stops = &request.node_ids;
        let travel = &self.config.travel;
        debug!("planning {plan:?} over {} stops", stops.len());
        match plan {
            Plan::Tour(algorithm) => {
                let solver = self
                    .solvers
                    .get(algorithm)
                    .ok_or_else(|| Rejection::UnknownAlgorithm(algorithm.name().to_owned()))?;
                let graph = ReducedGraph::build(&oracle, stops)?;
                let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
                let tour = solver
                    .solve(&graph, 0, &mut rng)
                    .map_err(Rejection::from)?;
                assemble_tour(network, &oracle, &graph.to_stops(&tour), travel)
            }
            Plan::Fleet(trucks) => {
                let fleet = ClarkeWright::new(trucks)
                    .plan(&oracle, stops)
                    .map_err(RouteError::in_fleet)?;
                assemble_fleet(network, &oracle, fleet.depot, &fleet.routes, travel)
            }
        }
    }

    /// Run `request` and fold every outcome into a [`RouteResult`].
    #[must_use]
    pub fn compute(&self, network: &RoadNetwork, request: &RouteRequest) -> RouteResult {
        match self.plan(network, request) {
            Ok(result) => result,
            Err(err) => {
                if let RouteError::PartialFailure(_) = &err {
                    warn!("route for {:?} degraded: {err}", request.node_ids);
                } else {
                    debug!("rejected route request: {err}");
                }
                RouteResult::failed(&err)
            }
        }
    }

    /// Run `request` against the active network of `store`.
    ///
    /// The snapshot taken at the start is used throughout, so a concurrent
    /// city switch does not affect this computation.
    #[must_use]
    pub fn compute_on(&self, store: &NetworkStore, request: &RouteRequest) -> RouteResult {
        match store.current() {
            Ok(snapshot) => self.compute(&snapshot, request),
            Err(err) => {
                debug!("no network for route request: {err}");
                RouteResult::failed(&Rejection::NetworkNotLoaded.into())
            }
        }
    }
}

/// Compute a route with the default planner.
///
/// # Examples
/// ```rust
/// use roadtour::{Algorithm, RouteRequest, RouteStatus, compute_route};
/// use roadtour_core::test_support::triangle_network;
///
/// let network = triangle_network();
/// let result = compute_route(
///     &network,
///     &RouteRequest::tour(vec![1, 2, 3], Algorithm::NearestNeighbor),
/// );
/// assert_eq!(result.status, RouteStatus::Success);
/// assert_eq!(result.ordered_points, vec![1, 2, 3]);
/// ```
#[must_use]
pub fn compute_route(network: &RoadNetwork, request: &RouteRequest) -> RouteResult {
    RoutePlanner::default().compute(network, request)
}
