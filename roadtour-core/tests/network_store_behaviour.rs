//! Behavioural tests for the network store.

use std::cell::{Cell, RefCell};

use roadtour_core::{EdgeData, NetworkError, NetworkSnapshot, NetworkStore, RoadNetwork, StoreError};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

fn line_network(ids: &[u64]) -> Result<RoadNetwork, NetworkError> {
    let mut builder = RoadNetwork::builder();
    let mut lat = 50.0;
    for &id in ids {
        builder.add_node(id, lat, 4.0)?;
        lat += 0.001;
    }
    for pair in ids.windows(2) {
        if let [a, b] = *pair {
            builder.add_two_way(a, b, EdgeData::straight(100.0))?;
        }
    }
    Ok(builder.build())
}

/// World state for store scenarios.
#[derive(Debug, Default)]
struct StoreWorld {
    store: NetworkStore,
    loads: Cell<usize>,
    snapshot: RefCell<Option<Result<NetworkSnapshot, StoreError>>>,
}

#[fixture]
fn world() -> StoreWorld {
    StoreWorld::default()
}

#[given("an empty network store")]
fn given_empty_store(world: &StoreWorld) {
    assert!(world.store.cities().is_empty());
}

#[given("a store with Kyiv active")]
fn given_kyiv_active(world: &StoreWorld) {
    world
        .store
        .insert("Kyiv", line_network(&[1, 2, 3]).expect("valid network"));
    world
        .store
        .insert("Lviv", line_network(&[10, 20, 30, 40]).expect("valid network"));
    world.store.activate("Kyiv").expect("Kyiv is cached");
}

#[when("a snapshot is requested")]
fn when_snapshot_requested(world: &StoreWorld) {
    world.snapshot.replace(Some(world.store.current()));
}

#[when("the city Kyiv is loaded twice")]
fn when_loaded_twice(world: &StoreWorld) {
    for _ in 0..2 {
        world
            .store
            .load_with("Kyiv", || {
                world.loads.set(world.loads.get() + 1);
                line_network(&[1, 2, 3])
            })
            .expect("loader succeeds");
    }
}

#[when("a snapshot is taken and Lviv is activated")]
fn when_swapped(world: &StoreWorld) {
    let snapshot = world.store.current();
    world.store.activate("Lviv").expect("Lviv is cached");
    world.snapshot.replace(Some(snapshot));
}

#[then("the store reports that no graph is loaded")]
fn then_not_loaded(world: &StoreWorld) {
    let borrowed = world.snapshot.borrow();
    let err = borrowed
        .as_ref()
        .and_then(|result| result.as_ref().err())
        .expect("snapshot should fail");
    assert_eq!(err, &StoreError::NotLoaded);
    assert_eq!(err.to_string(), "Graph not loaded");
}

#[then("the loader ran once")]
fn then_loader_once(world: &StoreWorld) {
    assert_eq!(world.loads.get(), 1);
}

#[then("the active city is Kyiv")]
fn then_active_kyiv(world: &StoreWorld) {
    let snapshot = world.store.current().expect("a network is active");
    assert_eq!(snapshot.city(), "Kyiv");
}

#[then("the active city is Lviv")]
fn then_active_lviv(world: &StoreWorld) {
    let snapshot = world.store.current().expect("a network is active");
    assert_eq!(snapshot.city(), "Lviv");
    assert_eq!(snapshot.node_count(), 4);
}

#[then("the snapshot still sees 3 nodes")]
fn then_snapshot_kept(world: &StoreWorld) {
    let borrowed = world.snapshot.borrow();
    let snapshot = borrowed
        .as_ref()
        .and_then(|result| result.as_ref().ok())
        .expect("snapshot was taken");
    assert_eq!(snapshot.city(), "Kyiv");
    assert_eq!(snapshot.node_count(), 3);
    assert!(snapshot.version() < world.store.version());
}

#[scenario(path = "tests/features/network_store.feature", index = 0)]
fn not_loaded(world: StoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/network_store.feature", index = 1)]
fn cached_city(world: StoreWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/network_store.feature", index = 2)]
fn snapshot_survives_swap(world: StoreWorld) {
    let _ = world;
}
