//! Property-based tests for the savings merge.
//!
//! # Invariants tested
//!
//! - **Partition:** kept and discarded routes together hold every client
//!   exactly once.
//! - **Fleet cap:** no more routes are kept than there are trucks.
//! - **Order:** savings are non-increasing.

use proptest::prelude::*;
use roadtour_solver_vrp::SavingsTable;

/// Strategy for a random asymmetric distance table over `1..=max` clients.
fn table_strategy(max: usize) -> impl Strategy<Value = SavingsTable> {
    (1..=max).prop_flat_map(|clients| {
        (
            proptest::collection::vec(1.0_f64..1000.0, clients),
            proptest::collection::vec(1.0_f64..1000.0, clients),
            proptest::collection::vec(proptest::collection::vec(1.0_f64..1000.0, clients), clients),
        )
            .prop_map(|(from_depot, to_depot, mut between)| {
                for (idx, row) in between.iter_mut().enumerate() {
                    if let Some(diagonal) = row.get_mut(idx) {
                        *diagonal = 0.0;
                    }
                }
                SavingsTable::new(from_depot, to_depot, between).expect("square table")
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: merging partitions the clients between kept and discarded
    /// routes.
    #[test]
    fn merge_partitions_clients(table in table_strategy(12), trucks in 1_usize..5) {
        let merged = table.merge(trucks);
        let mut clients: Vec<usize> = merged
            .routes
            .iter()
            .chain(&merged.discarded)
            .flatten()
            .copied()
            .collect();
        clients.sort_unstable();
        prop_assert_eq!(clients, (0..table.clients()).collect::<Vec<_>>());
    }

    /// Property: never more routes than trucks, and none empty.
    #[test]
    fn merge_respects_fleet_size(table in table_strategy(12), trucks in 1_usize..5) {
        let merged = table.merge(trucks);
        prop_assert!(merged.routes.len() <= trucks);
        prop_assert!(merged.routes.iter().all(|route| !route.is_empty()));
    }

    /// Property: savings are sorted largest first.
    #[test]
    fn savings_are_non_increasing(table in table_strategy(10)) {
        let savings = table.savings();
        let ordered = savings
            .windows(2)
            .all(|pair| pair.first().zip(pair.last()).is_none_or(|(a, b)| a.value >= b.value));
        prop_assert!(ordered, "savings should be sorted largest first");
    }
}
