//! Segment-reversal local search seeded with the greedy tour.
//!
//! A move reverses the contiguous block `tour[i..j]` with `i >= 1` so the
//! start never moves, `j >= i + 2` so the block holds at least two stops,
//! and `j < tour.len()` so the last stop never moves either. A move is kept
//! only if the path length strictly decreases, and sweeps repeat until one
//! finds no such move. Every kept move shortens the path, so the search
//! terminates at a local optimum no longer than the greedy tour.
//!
//! Candidates are screened by the change in length of the four boundary
//! edges plus the reversed interior of the block, so only promising moves
//! are applied and measured in full.

use rand::RngCore;
use roadtour_core::{ReducedGraph, SolverError, TourSolver, check_start};

use crate::greedy::greedy_tour;

/// Improve `tour` in place until no single reversal shortens it.
///
/// Returns the number of accepted moves.
pub fn improve(graph: &ReducedGraph, tour: &mut [usize]) -> usize {
    let len = tour.len();
    if len < 4 {
        return 0;
    }
    let mut best = graph.path_length(tour);
    let mut accepted = 0;
    loop {
        let mut improved = false;
        for i in 1..len - 2 {
            for j in (i + 2)..len {
                if reversal_delta(graph, tour, i, j) >= 0.0 {
                    continue;
                }
                let Some(block) = tour.get_mut(i..j) else {
                    continue;
                };
                block.reverse();
                let candidate = graph.path_length(tour);
                if candidate < best {
                    best = candidate;
                    accepted += 1;
                    improved = true;
                } else if let Some(undo) = tour.get_mut(i..j) {
                    undo.reverse();
                }
            }
        }
        if !improved {
            return accepted;
        }
    }
}

/// Change in path length from reversing `tour[i..j]`.
///
/// Weights are directed, so the interior of the block is re-weighted in the
/// reverse direction as well.
#[expect(
    clippy::float_arithmetic,
    reason = "the move delta sums directed edge weights"
)]
fn reversal_delta(graph: &ReducedGraph, tour: &[usize], i: usize, j: usize) -> f64 {
    let (Some(&a), Some(block), Some(&d)) = (tour.get(i - 1), tour.get(i..j), tour.get(j)) else {
        return 0.0;
    };
    let (Some(&b), Some(&c)) = (block.first(), block.last()) else {
        return 0.0;
    };
    let interior: f64 = block
        .windows(2)
        .map(|pair| match *pair {
            [x, y] => graph.weight(y, x) - graph.weight(x, y),
            _ => 0.0,
        })
        .sum();
    graph.weight(a, c) + graph.weight(b, d) - graph.weight(a, b) - graph.weight(c, d) + interior
}

/// Greedy construction followed by 2-opt improvement.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoOptSolver;

impl TourSolver for TwoOptSolver {
    fn solve(
        &self,
        graph: &ReducedGraph,
        start: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>, SolverError> {
        check_start(graph, start)?;
        let mut tour = greedy_tour(graph, start);
        let moves = improve(graph, &mut tour);
        log::debug!("2-opt accepted {moves} reversals over {} stops", tour.len());
        Ok(tour)
    }
}
