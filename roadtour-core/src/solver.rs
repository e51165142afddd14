//! Tour solver contract and algorithm selection.
//!
//! Solvers work purely on a [`ReducedGraph`]; they never see the road
//! network. A tour is a permutation of the graph's vertex indices beginning
//! with the designated start.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::error::Rejection;
use crate::reduced::ReducedGraph;

/// Routing algorithms understood by the planner.
///
/// Parsing accepts the snake-case name as well as the display label used by
/// map front ends.
///
/// # Examples
/// ```
/// use roadtour_core::Algorithm;
///
/// assert_eq!("two_opt".parse::<Algorithm>(), Ok(Algorithm::TwoOpt));
/// assert_eq!("2-opt Heuristic".parse::<Algorithm>(), Ok(Algorithm::TwoOpt));
/// assert_eq!(Algorithm::TwoOpt.to_string(), "two_opt");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    /// Christofides-style metric approximation.
    Approximate,
    /// Repeatedly append the closest unvisited stop.
    Greedy,
    /// Same selection rule as [`Algorithm::Greedy`].
    NearestNeighbor,
    /// Randomised segment reversal with a cooling schedule.
    SimulatedAnnealing,
    /// Greedy start improved by segment reversals.
    TwoOpt,
    /// Exhaustive enumeration.
    BruteForce,
    /// Clarke & Wright savings for several vehicles.
    ClarkeWright,
}

impl Algorithm {
    /// Every algorithm, single-vehicle ones first.
    pub const ALL: [Self; 7] = [
        Self::Approximate,
        Self::Greedy,
        Self::NearestNeighbor,
        Self::SimulatedAnnealing,
        Self::TwoOpt,
        Self::BruteForce,
        Self::ClarkeWright,
    ];

    /// Algorithms that produce a single-vehicle tour.
    pub const TOURS: [Self; 6] = [
        Self::Approximate,
        Self::Greedy,
        Self::NearestNeighbor,
        Self::SimulatedAnnealing,
        Self::TwoOpt,
        Self::BruteForce,
    ];

    /// Snake-case wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Approximate => "approximate",
            Self::Greedy => "greedy",
            Self::NearestNeighbor => "nearest_neighbor",
            Self::SimulatedAnnealing => "simulated_annealing",
            Self::TwoOpt => "two_opt",
            Self::BruteForce => "brute_force",
            Self::ClarkeWright => "clarke_wright",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Approximate => "Christofides Algorithm",
            Self::Greedy => "Greedy Algorithm",
            Self::NearestNeighbor => "Nearest Neighbor",
            Self::SimulatedAnnealing => "Simulated Annealing",
            Self::TwoOpt => "2-opt Heuristic",
            Self::BruteForce => "Brute Force",
            Self::ClarkeWright => "Clarke & Wright Savings",
        }
    }

    /// Whether the algorithm plans for several vehicles.
    #[must_use]
    pub const fn is_fleet(self) -> bool {
        matches!(self, Self::ClarkeWright)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Rejection;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|algo| algo.name() == trimmed || algo.label() == trimmed)
            .ok_or_else(|| Rejection::UnknownAlgorithm(trimmed.to_owned()))
    }
}

#[cfg(feature = "serde")]
impl Serialize for Algorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Reasons a solver refuses its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// The start index is not a vertex of the graph.
    #[error("start index {start} is outside a graph of {len} stops")]
    StartOutOfRange {
        /// Requested start.
        start: usize,
        /// Number of vertices.
        len: usize,
    },
    /// The solver needs more stops than the graph has.
    #[error("at least {required} stops are required, got {actual}")]
    TooFewStops {
        /// Minimum number of stops.
        required: usize,
        /// Number of stops supplied.
        actual: usize,
    },
    /// Solver parameters would not terminate or make no sense.
    #[error("invalid solver configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Produce a visiting order over a reduced graph.
///
/// Implementations return a permutation of `0..graph.len()` whose first
/// element is `start`. Randomised solvers draw exclusively from `rng` so that
/// a seeded generator yields reproducible tours.
/// Solvers must be `Send + Sync` to be shared across request threads.
pub trait TourSolver: Send + Sync {
    /// Solve for a tour beginning at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] when the input cannot be solved.
    fn solve(
        &self,
        graph: &ReducedGraph,
        start: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>, SolverError>;
}

/// Ensure `start` indexes a vertex of `graph`.
///
/// # Errors
///
/// Returns [`SolverError::StartOutOfRange`] otherwise.
pub const fn check_start(graph: &ReducedGraph, start: usize) -> Result<(), SolverError> {
    let len = graph.len();
    if start < len {
        Ok(())
    } else {
        Err(SolverError::StartOutOfRange { start, len })
    }
}

/// Whether `tour` visits each of `0..len` exactly once, beginning at `start`.
#[must_use]
pub fn is_tour(tour: &[usize], len: usize, start: usize) -> bool {
    if tour.len() != len || tour.first() != Some(&start) {
        return false;
    }
    let mut seen = vec![false; len];
    tour.iter().all(|&idx| match seen.get_mut(idx) {
        Some(flag) if !*flag => {
            *flag = true;
            true
        }
        _ => false,
    })
}
