//! Single-vehicle tour heuristics for roadtour.
//!
//! Every solver implements [`TourSolver`](roadtour_core::TourSolver) over a
//! [`ReducedGraph`](roadtour_core::ReducedGraph): Christofides-style
//! approximation, greedy nearest-neighbour construction, 2-opt local search,
//! simulated annealing and exhaustive enumeration. [`TourSolvers`] maps each
//! [`Algorithm`](roadtour_core::Algorithm) to its configured solver.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod annealing;
mod brute_force;
mod christofides;
mod greedy;
mod registry;
mod two_opt;

pub use annealing::{AnnealingSchedule, SimulatedAnnealingSolver};
pub use brute_force::{BruteForceSolver, next_permutation};
pub use christofides::{ChristofidesSolver, christofides_tour};
pub use greedy::{GreedySolver, greedy_tour};
pub use registry::TourSolvers;
pub use two_opt::{TwoOptSolver, improve};
