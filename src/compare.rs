//! Run several tour algorithms over one stop list and compare the results.

use std::time::Instant;

use log::{info, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use roadtour_core::{Algorithm, NodeId, Rejection, RoadNetwork, RouteResult};

use crate::planner::{RoutePlanner, RouteRequest};

/// Limits applied before a comparison runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatchPolicy {
    /// Most stops a comparison accepts.
    pub hard_limit: usize,
    /// Most stops brute force is attempted on.
    pub brute_force_limit: usize,
    /// Stop count above which a slowness warning is attached.
    pub warning_threshold: usize,
    /// Fewest stops simulated annealing is attempted on.
    pub annealing_min_stops: usize,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            hard_limit: 45,
            brute_force_limit: 12,
            warning_threshold: 10,
            annealing_min_stops: 5,
        }
    }
}

/// Outcome of one algorithm within a comparison.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComparisonRun {
    /// Algorithm that produced this run.
    pub algorithm: Algorithm,
    /// Full response, including geometry.
    pub result: RouteResult,
    /// Wall-clock time spent computing the response, in seconds.
    pub compute_time_sec: f64,
    /// Rough count of candidate orderings examined.
    pub expansions: u64,
    /// Distance relative to the best successful run, rounded to three places.
    pub heuristic_ratio: Option<f64>,
}

/// An algorithm left out of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkippedRun {
    /// Algorithm that was not run.
    pub algorithm: Algorithm,
    /// Why it was not run.
    pub reason: String,
}

/// All runs of a comparison.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Comparison {
    /// Completed runs, in request order.
    pub runs: Vec<ComparisonRun>,
    /// Algorithms that were not run.
    pub skipped: Vec<SkippedRun>,
    /// Advisory messages for the caller.
    pub warnings: Vec<String>,
}

impl Comparison {
    /// The successful run with the shortest total distance.
    #[must_use]
    pub fn best(&self) -> Option<&ComparisonRun> {
        self.runs
            .iter()
            .filter_map(|run| Some((run, successful_distance(&run.result)?)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(run, _)| run)
    }
}

/// Run `algorithms` over `node_ids` on one vehicle, all with the same seed.
///
/// Brute force is skipped above [`BatchPolicy::brute_force_limit`] stops and
/// simulated annealing below [`BatchPolicy::annealing_min_stops`]. Fleet
/// algorithms are skipped.
///
/// # Errors
///
/// Returns [`Rejection::TooFewStops`] for fewer than two stops and
/// [`Rejection::TooManyStops`] above [`BatchPolicy::hard_limit`].
pub fn compare_algorithms(
    planner: &RoutePlanner,
    network: &RoadNetwork,
    node_ids: &[NodeId],
    algorithms: &[Algorithm],
    seed: u64,
    policy: &BatchPolicy,
) -> Result<Comparison, Rejection> {
    let stops = node_ids.len();
    if stops < 2 {
        return Err(Rejection::TooFewStops);
    }
    if stops > policy.hard_limit {
        return Err(Rejection::TooManyStops {
            limit: policy.hard_limit,
        });
    }

    let mut comparison = Comparison::default();
    if stops > policy.warning_threshold {
        comparison.warnings.push(format!(
            "You have selected more than {} points. Some algorithms might be slow.",
            policy.warning_threshold
        ));
    }

    for &algorithm in algorithms {
        if let Some(reason) = skip_reason(algorithm, stops, policy) {
            warn!("skipping {algorithm}: {reason}");
            comparison.skipped.push(SkippedRun { algorithm, reason });
            continue;
        }
        let request = RouteRequest::tour(node_ids.to_vec(), algorithm).with_seed(seed);
        let started_at = Instant::now();
        let result = planner.compute(network, &request);
        let compute_time_sec = started_at.elapsed().as_secs_f64();
        comparison.runs.push(ComparisonRun {
            algorithm,
            result,
            compute_time_sec,
            expansions: expansions(algorithm, stops),
            heuristic_ratio: None,
        });
    }

    let shortest = comparison
        .best()
        .and_then(|run| successful_distance(&run.result));
    if let Some(best) = shortest {
        for run in &mut comparison.runs {
            run.heuristic_ratio = successful_distance(&run.result).map(|d| ratio(d, best));
        }
    }
    info!(
        "compared {} algorithms over {stops} stops, skipped {}",
        comparison.runs.len(),
        comparison.skipped.len()
    );
    Ok(comparison)
}

fn skip_reason(algorithm: Algorithm, stops: usize, policy: &BatchPolicy) -> Option<String> {
    match algorithm {
        Algorithm::BruteForce if stops > policy.brute_force_limit => Some(format!(
            "Brute Force is limited to {} points",
            policy.brute_force_limit
        )),
        Algorithm::SimulatedAnnealing if stops < policy.annealing_min_stops => Some(format!(
            "Simulated Annealing requires at least {} points.",
            policy.annealing_min_stops
        )),
        other if other.is_fleet() => Some(format!("{} plans several vehicles", other.label())),
        _ => None,
    }
}

/// `(n - 1)!` orderings for brute force and `n^2` distance checks for
/// nearest neighbour; other algorithms report zero.
fn expansions(algorithm: Algorithm, stops: usize) -> u64 {
    let n = u64::try_from(stops).unwrap_or(u64::MAX);
    match algorithm {
        Algorithm::BruteForce => (1..n).fold(1_u64, u64::saturating_mul),
        Algorithm::NearestNeighbor => n.saturating_mul(n),
        _ => 0,
    }
}

fn successful_distance(result: &RouteResult) -> Option<f64> {
    if result.is_success() {
        result.total_distance
    } else {
        None
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "ratio is rounded to three decimal places"
)]
fn ratio(distance: f64, best: f64) -> f64 {
    if best <= 0.0 {
        return 1.0;
    }
    (distance / best * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadtour_core::test_support::{grid_network, grid_node, triangle_network};
    use rstest::rstest;

    #[rstest]
    #[case(Algorithm::BruteForce, 5, 24)]
    #[case(Algorithm::BruteForce, 1, 1)]
    #[case(Algorithm::NearestNeighbor, 7, 49)]
    #[case(Algorithm::TwoOpt, 7, 0)]
    fn expansion_estimates(#[case] algorithm: Algorithm, #[case] stops: usize, #[case] expected: u64) {
        assert_eq!(expansions(algorithm, stops), expected);
    }

    #[rstest]
    fn brute_force_expansions_saturate() {
        assert_eq!(expansions(Algorithm::BruteForce, 45), u64::MAX);
    }

    #[rstest]
    #[case(1234.0, 1000.0, 1.234)]
    #[case(1000.0, 1000.0, 1.0)]
    #[case(1000.4, 1000.0, 1.0)]
    fn ratios_round_to_three_places(#[case] distance: f64, #[case] best: f64, #[case] expected: f64) {
        assert!((ratio(distance, best) - expected).abs() < 1e-12);
    }

    #[rstest]
    fn rejects_oversized_batches() {
        let network = grid_network(7, 7, 100.0);
        let stops: Vec<NodeId> = (0..46).map(|idx| idx + 1).collect();
        let err = compare_algorithms(
            &RoutePlanner::new(),
            &network,
            &stops,
            &Algorithm::TOURS,
            0,
            &BatchPolicy::default(),
        )
        .expect_err("over the hard limit");
        assert_eq!(err, Rejection::TooManyStops { limit: 45 });
        assert_eq!(err.to_string(), "Max 45 points allowed.");
    }

    #[rstest]
    fn small_batches_skip_annealing() {
        let network = triangle_network();
        let comparison = compare_algorithms(
            &RoutePlanner::new(),
            &network,
            &[1, 2, 3],
            &Algorithm::ALL,
            0,
            &BatchPolicy::default(),
        )
        .expect("valid batch");
        let skipped: Vec<Algorithm> = comparison.skipped.iter().map(|s| s.algorithm).collect();
        assert_eq!(
            skipped,
            vec![Algorithm::SimulatedAnnealing, Algorithm::ClarkeWright]
        );
        assert_eq!(comparison.runs.len(), 5);
        assert!(comparison.warnings.is_empty());
        assert!(comparison.runs.iter().all(|run| run.result.is_success()));
        assert!(
            comparison
                .runs
                .iter()
                .all(|run| run.heuristic_ratio.is_some_and(|r| r >= 1.0))
        );
    }

    #[rstest]
    fn large_batches_warn_and_skip_brute_force() {
        let network = grid_network(4, 4, 100.0);
        let stops: Vec<NodeId> = (0..13).map(|idx| grid_node(4, idx / 4, idx % 4)).collect();
        let policy = BatchPolicy::default();
        let comparison = compare_algorithms(
            &RoutePlanner::new(),
            &network,
            &stops,
            &[Algorithm::BruteForce, Algorithm::Greedy],
            3,
            &policy,
        )
        .expect("valid batch");
        assert_eq!(comparison.warnings.len(), 1);
        assert_eq!(comparison.skipped.len(), 1);
        assert_eq!(comparison.runs.len(), 1);
        let best = comparison.best().expect("greedy succeeded");
        assert_eq!(best.algorithm, Algorithm::Greedy);
        assert_eq!(best.heuristic_ratio, Some(1.0));
    }
}
