//! Property-based tests for route planning on a connected grid.
//!
//! # Invariants tested
//!
//! - **Permutation:** a successful tour visits every requested stop once,
//!   starting at the first.
//! - **Determinism:** the same request and seed always give the same result.
//! - **Fleet coverage:** fleet routes never repeat a client or include the
//!   depot, and never exceed the truck count.

use std::collections::HashSet;

use proptest::prelude::*;
use roadtour::{Algorithm, NodeId, RouteRequest, RouteStatus, compute_route};
use roadtour_core::test_support::{grid_network, grid_node};

const ROWS: u64 = 5;
const COLS: u64 = 5;

/// Distinct grid nodes, `min..=max` of them, in random order.
fn stops_strategy(min: usize, max: usize) -> impl Strategy<Value = Vec<NodeId>> {
    let all: Vec<NodeId> = (0..ROWS)
        .flat_map(|row| (0..COLS).map(move |col| grid_node(COLS, row, col)))
        .collect();
    (min..=max).prop_flat_map(move |len| {
        Just(all.clone())
            .prop_shuffle()
            .prop_map(move |nodes| nodes.into_iter().take(len).collect())
    })
}

fn algorithm_strategy() -> impl Strategy<Value = Algorithm> {
    proptest::sample::select(Algorithm::TOURS.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: tours are permutations of the request starting at its head.
    #[test]
    fn tours_are_permutations(
        stops in stops_strategy(5, 8),
        algorithm in algorithm_strategy(),
        seed in any::<u64>(),
    ) {
        let network = grid_network(ROWS, COLS, 100.0);
        let request = RouteRequest::tour(stops.clone(), algorithm).with_seed(seed);
        let result = compute_route(&network, &request);
        prop_assert_eq!(result.status, RouteStatus::Success);
        prop_assert_eq!(result.ordered_points.first(), stops.first());
        let visited: HashSet<_> = result.ordered_points.iter().copied().collect();
        prop_assert_eq!(visited.len(), stops.len());
        prop_assert_eq!(visited, stops.iter().copied().collect::<HashSet<_>>());
    }

    /// Property: requests are deterministic for a fixed seed.
    #[test]
    fn seeded_requests_are_deterministic(
        stops in stops_strategy(5, 7),
        seed in any::<u64>(),
    ) {
        let network = grid_network(ROWS, COLS, 100.0);
        let request =
            RouteRequest::tour(stops, Algorithm::SimulatedAnnealing).with_seed(seed);
        prop_assert_eq!(compute_route(&network, &request), compute_route(&network, &request));
    }

    /// Property: fleet routes serve each client at most once.
    #[test]
    fn fleet_clients_are_unique(
        stops in stops_strategy(2, 10),
        trucks in 2_usize..5,
    ) {
        let network = grid_network(ROWS, COLS, 100.0);
        let result = compute_route(&network, &RouteRequest::fleet(stops.clone(), trucks));
        prop_assert_eq!(result.status, RouteStatus::Success);
        let routes = result.vrp_routes.unwrap_or_default();
        prop_assert!(routes.len() <= trucks);
        let mut seen = HashSet::new();
        for route in &routes {
            for client in &route.ordered_points {
                prop_assert!(stops.first() != Some(client));
                prop_assert!(seen.insert(*client));
            }
        }
    }
}
