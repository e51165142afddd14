//! Nearest-unvisited construction.

use rand::RngCore;
use roadtour_core::{ReducedGraph, SolverError, TourSolver, check_start};

/// Build a tour by repeatedly moving to the closest unvisited stop.
///
/// Ties go to the lowest vertex index. Weights are read in the direction of
/// travel, so asymmetric graphs are handled as given.
#[must_use]
pub fn greedy_tour(graph: &ReducedGraph, start: usize) -> Vec<usize> {
    let len = graph.len();
    let mut visited = vec![false; len];
    let mut tour = Vec::with_capacity(len);
    let mut current = start;
    if let Some(flag) = visited.get_mut(start) {
        *flag = true;
        tour.push(start);
    }
    while tour.len() < len {
        let nearest = (0..len)
            .filter(|&candidate| visited.get(candidate) == Some(&false))
            .min_by(|&a, &b| graph.weight(current, a).total_cmp(&graph.weight(current, b)));
        let Some(next) = nearest else { break };
        if let Some(flag) = visited.get_mut(next) {
            *flag = true;
        }
        tour.push(next);
        current = next;
    }
    tour
}

/// Greedy and nearest-neighbour construction.
///
/// Both names describe the same selection rule here: always extend the tour
/// from its last stop to the nearest stop not yet visited.
///
/// # Examples
/// ```
/// use rand::rngs::mock::StepRng;
/// use roadtour_core::{ReducedGraph, TourSolver};
/// use roadtour_solver_tsp::GreedySolver;
///
/// let graph = ReducedGraph::from_matrix(
///     vec![10, 20, 30],
///     vec![
///         vec![0.0, 100.0, 150.0],
///         vec![100.0, 0.0, 100.0],
///         vec![150.0, 100.0, 0.0],
///     ],
/// )
/// .expect("square matrix");
/// let tour = GreedySolver.solve(&graph, 0, &mut StepRng::new(0, 1)).expect("valid start");
/// assert_eq!(tour, vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl TourSolver for GreedySolver {
    fn solve(
        &self,
        graph: &ReducedGraph,
        start: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<usize>, SolverError> {
        check_start(graph, start)?;
        Ok(greedy_tour(graph, start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use roadtour_core::test_support::reduced_from_matrix;
    use rstest::rstest;

    #[rstest]
    fn follows_cheapest_outgoing_edge() {
        let graph = reduced_from_matrix(vec![
            vec![0.0, 5.0, 1.0, 9.0],
            vec![5.0, 0.0, 2.0, 1.0],
            vec![1.0, 2.0, 0.0, 7.0],
            vec![9.0, 1.0, 7.0, 0.0],
        ]);
        assert_eq!(greedy_tour(&graph, 0), vec![0, 2, 1, 3]);
        assert_eq!(greedy_tour(&graph, 3), vec![3, 1, 2, 0]);
    }

    #[rstest]
    fn ties_go_to_lowest_index() {
        let graph = reduced_from_matrix(vec![
            vec![0.0, 4.0, 4.0],
            vec![4.0, 0.0, 4.0],
            vec![4.0, 4.0, 0.0],
        ]);
        assert_eq!(greedy_tour(&graph, 2), vec![2, 0, 1]);
    }

    #[rstest]
    fn respects_direction() {
        let graph = reduced_from_matrix(vec![
            vec![0.0, 9.0, 1.0],
            vec![1.0, 0.0, 9.0],
            vec![9.0, 1.0, 0.0],
        ]);
        assert_eq!(greedy_tour(&graph, 0), vec![0, 2, 1]);
    }

    #[rstest]
    fn rejects_out_of_range_start() {
        let graph = reduced_from_matrix(vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
        let err = GreedySolver
            .solve(&graph, 5, &mut StepRng::new(0, 1))
            .expect_err("start out of range");
        assert_eq!(err, SolverError::StartOutOfRange { start: 5, len: 2 });
    }
}
