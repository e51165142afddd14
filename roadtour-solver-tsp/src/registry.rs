//! Algorithm to solver lookup.

use roadtour_core::{Algorithm, TourSolver};

use crate::annealing::{AnnealingSchedule, SimulatedAnnealingSolver};
use crate::brute_force::BruteForceSolver;
use crate::christofides::ChristofidesSolver;
use crate::greedy::GreedySolver;
use crate::two_opt::TwoOptSolver;

/// One configured instance of every tour solver.
///
/// # Examples
/// ```
/// use roadtour_core::Algorithm;
/// use roadtour_solver_tsp::TourSolvers;
///
/// let solvers = TourSolvers::default();
/// assert!(solvers.get(Algorithm::TwoOpt).is_some());
/// assert!(solvers.get(Algorithm::ClarkeWright).is_none());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TourSolvers {
    approximate: ChristofidesSolver,
    greedy: GreedySolver,
    annealing: SimulatedAnnealingSolver,
    two_opt: TwoOptSolver,
    brute_force: BruteForceSolver,
}

impl TourSolvers {
    /// Solvers using `schedule` for simulated annealing.
    #[must_use]
    pub fn with_schedule(schedule: AnnealingSchedule) -> Self {
        Self {
            annealing: SimulatedAnnealingSolver::with_schedule(schedule),
            ..Self::default()
        }
    }

    /// The solver for `algorithm`, or `None` for algorithms that do not
    /// produce a single-vehicle tour.
    #[must_use]
    pub fn get(&self, algorithm: Algorithm) -> Option<&dyn TourSolver> {
        match algorithm {
            Algorithm::Approximate => Some(&self.approximate),
            Algorithm::Greedy | Algorithm::NearestNeighbor => Some(&self.greedy),
            Algorithm::SimulatedAnnealing => Some(&self.annealing),
            Algorithm::TwoOpt => Some(&self.two_opt),
            Algorithm::BruteForce => Some(&self.brute_force),
            Algorithm::ClarkeWright => None,
        }
    }

    /// The simulated annealing schedule in use.
    #[must_use]
    pub const fn schedule(&self) -> &AnnealingSchedule {
        self.annealing.schedule()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn every_tour_algorithm_has_a_solver() {
        let solvers = TourSolvers::default();
        for algorithm in Algorithm::TOURS {
            assert!(solvers.get(algorithm).is_some(), "{algorithm} missing");
        }
    }

    #[rstest]
    fn schedule_is_forwarded() {
        let schedule = AnnealingSchedule {
            min_stops: 6,
            ..AnnealingSchedule::default()
        };
        assert_eq!(TourSolvers::with_schedule(schedule).schedule().min_stops, 6);
    }
}
