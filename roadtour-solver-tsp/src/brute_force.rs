//! Exhaustive search over every ordering of the non-start stops.
//!
//! Cost grows factorially. The solver itself imposes no size limit; callers
//! decide how many stops they are prepared to enumerate.

use rand::RngCore;
use roadtour_core::{ReducedGraph, SolverError, TourSolver, check_start};

/// Advance `items` to the next lexicographic permutation.
///
/// Returns `false`, leaving `items` untouched, once the last permutation has
/// been reached.
pub fn next_permutation(items: &mut [usize]) -> bool {
    let Some(pivot) = items.windows(2).rposition(|pair| pair.first() < pair.last()) else {
        return false;
    };
    let Some(pivot_value) = items.get(pivot).copied() else {
        return false;
    };
    let Some(successor) = items.iter().rposition(|&item| item > pivot_value) else {
        return false;
    };
    items.swap(pivot, successor);
    if let Some(tail) = items.get_mut(pivot + 1..) {
        tail.reverse();
    }
    true
}

/// Enumerate `[start] + perm + [start]` for every permutation and keep the
/// shortest cycle.
///
/// Permutations are visited in lexicographic order of vertex index and a
/// candidate must be strictly shorter to replace the incumbent, so the first
/// optimum wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceSolver;

impl TourSolver for BruteForceSolver {
    fn solve(
        &self,
        graph: &ReducedGraph,
        start: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>, SolverError> {
        check_start(graph, start)?;
        let mut candidate: Vec<usize> = Vec::with_capacity(graph.len());
        candidate.push(start);
        candidate.extend((0..graph.len()).filter(|&idx| idx != start));

        let mut best = candidate.clone();
        let mut best_len = graph.cycle_length(&candidate);
        let mut evaluated = 1_u64;
        loop {
            let advanced = candidate
                .get_mut(1..)
                .is_some_and(next_permutation);
            if !advanced {
                break;
            }
            evaluated += 1;
            let length = graph.cycle_length(&candidate);
            if length < best_len {
                best_len = length;
                best.clone_from(&candidate);
            }
        }
        log::debug!("brute force evaluated {evaluated} orderings");
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use roadtour_core::test_support::{euclidean_reduced, reduced_from_matrix};
    use rstest::rstest;

    #[rstest]
    fn permutations_are_lexicographic() {
        let mut items = vec![1, 2, 3];
        let mut seen = vec![items.clone()];
        while next_permutation(&mut items) {
            seen.push(items.clone());
        }
        assert_eq!(
            seen,
            vec![
                vec![1, 2, 3],
                vec![1, 3, 2],
                vec![2, 1, 3],
                vec![2, 3, 1],
                vec![3, 1, 2],
                vec![3, 2, 1],
            ]
        );
    }

    #[rstest]
    fn empty_and_single_have_no_successor() {
        assert!(!next_permutation(&mut []));
        assert!(!next_permutation(&mut [4]));
    }

    #[rstest]
    fn finds_the_shortest_cycle() {
        // Asymmetric: going 0 -> 2 -> 1 -> 0 is much cheaper.
        let graph = reduced_from_matrix(vec![
            vec![0.0, 10.0, 1.0],
            vec![1.0, 0.0, 10.0],
            vec![10.0, 1.0, 0.0],
        ]);
        let tour = BruteForceSolver
            .solve(&graph, 0, &mut StepRng::new(0, 1))
            .expect("valid start");
        assert_eq!(tour, vec![0, 2, 1]);
    }

    #[rstest]
    fn keeps_first_optimum_on_ties() {
        let graph = euclidean_reduced(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let tour = BruteForceSolver
            .solve(&graph, 0, &mut StepRng::new(0, 1))
            .expect("valid start");
        assert_eq!(tour, vec![0, 1, 2, 3]);
    }

    #[rstest]
    fn starts_anywhere() {
        let graph = euclidean_reduced(&[(0.0, 0.0), (2.0, 0.0), (1.0, 0.0)]);
        let tour = BruteForceSolver
            .solve(&graph, 2, &mut StepRng::new(0, 1))
            .expect("valid start");
        assert_eq!(tour.first(), Some(&2));
        assert!((graph.cycle_length(&tour) - 4.0).abs() < 1e-9);
    }
}
