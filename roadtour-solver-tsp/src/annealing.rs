//! Simulated annealing over closed tours.
//!
//! The search state is a cycle `[start, ..., start]`. Each step reverses a
//! random block strictly inside the cycle, so both copies of the start stay
//! in place. Improvements are always accepted; a longer candidate is accepted
//! with probability `exp((current - candidate) / T)`. The temperature decays
//! geometrically and the best cycle seen is returned without its closing
//! start. The stop just before the closing start never moves, and with
//! fewer than three stops no reversal exists, so the shuffled cycle is
//! returned as is.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use roadtour_core::{ReducedGraph, SolverError, TourSolver, check_start};

/// Cooling schedule and size guard for [`SimulatedAnnealingSolver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealingSchedule {
    /// Temperature of the first iteration.
    pub initial_temperature: f64,
    /// Multiplier applied to the temperature after every iteration.
    pub cooling_factor: f64,
    /// The search stops once the temperature is at or below this value.
    pub final_temperature: f64,
    /// Smallest number of stops the solver accepts. Requests are checked
    /// against this value before the solver runs.
    pub min_stops: usize,
}

impl Default for AnnealingSchedule {
    fn default() -> Self {
        Self {
            initial_temperature: 10_000.0,
            cooling_factor: 0.997,
            final_temperature: 1.0,
            min_stops: 5,
        }
    }
}

impl AnnealingSchedule {
    /// Check that the schedule cools towards a positive final temperature.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidConfig`] for schedules that would never
    /// terminate.
    pub fn validate(&self) -> Result<(), SolverError> {
        if !(self.cooling_factor > 0.0 && self.cooling_factor < 1.0) {
            return Err(SolverError::InvalidConfig(
                "cooling factor must lie strictly between 0 and 1",
            ));
        }
        if !(self.final_temperature > 0.0 && self.final_temperature.is_finite()) {
            return Err(SolverError::InvalidConfig(
                "final temperature must be positive and finite",
            ));
        }
        if !self.initial_temperature.is_finite() {
            return Err(SolverError::InvalidConfig(
                "initial temperature must be finite",
            ));
        }
        Ok(())
    }
}

/// Randomised 2-opt with a Metropolis acceptance rule.
///
/// All randomness is drawn from the generator passed to
/// [`TourSolver::solve`]; equal seeds give equal tours.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedAnnealingSolver {
    schedule: AnnealingSchedule,
}

impl SimulatedAnnealingSolver {
    /// Construct a solver with an explicit schedule.
    #[must_use]
    pub const fn with_schedule(schedule: AnnealingSchedule) -> Self {
        Self { schedule }
    }

    /// The schedule in use.
    #[must_use]
    pub const fn schedule(&self) -> &AnnealingSchedule {
        &self.schedule
    }
}

impl TourSolver for SimulatedAnnealingSolver {
    #[expect(
        clippy::float_arithmetic,
        reason = "acceptance probability and cooling are floating-point"
    )]
    fn solve(
        &self,
        graph: &ReducedGraph,
        start: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>, SolverError> {
        self.schedule.validate()?;
        check_start(graph, start)?;
        let len = graph.len();
        if len < self.schedule.min_stops {
            return Err(SolverError::TooFewStops {
                required: self.schedule.min_stops,
                actual: len,
            });
        }

        let mut others: Vec<usize> = (0..len).filter(|&idx| idx != start).collect();
        others.shuffle(rng);
        let mut current = Vec::with_capacity(len + 1);
        current.push(start);
        current.extend(others);
        current.push(start);

        // Block bounds: 1 <= i <= last - 2 and i + 1 <= j <= last - 1 where
        // `last` is the index of the closing start.
        let last = current.len() - 1;
        let mut current_len = graph.path_length(&current);
        let mut best = current.clone();
        let mut best_len = current_len;
        if last < 3 {
            best.pop();
            return Ok(best);
        }
        let mut temperature = self.schedule.initial_temperature;
        let mut iterations = 0_u64;

        while temperature > self.schedule.final_temperature {
            let i = rng.gen_range(1..=last - 2);
            let j = rng.gen_range(i + 1..=last - 1);
            let mut candidate = current.clone();
            if let Some(block) = candidate.get_mut(i..j) {
                block.reverse();
            }
            let candidate_len = graph.path_length(&candidate);
            let accept = candidate_len < current_len
                || rng.gen_range(0.0..1.0) < ((current_len - candidate_len) / temperature).exp();
            if accept {
                current = candidate;
                current_len = candidate_len;
                if current_len < best_len {
                    best.clone_from(&current);
                    best_len = current_len;
                }
            }
            temperature *= self.schedule.cooling_factor;
            iterations += 1;
        }

        log::debug!("annealing finished after {iterations} iterations at length {best_len:.1}");
        best.pop();
        Ok(best)
    }
}
