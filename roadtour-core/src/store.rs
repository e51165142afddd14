//! Process-wide home of the active road network.
//!
//! [`NetworkStore`] caches loaded networks by city and points at one of them
//! as the active network. Requests take a [`NetworkSnapshot`] when they start
//! and keep computing against it even if another thread activates a
//! different city meanwhile; the snapshot holds its own reference to the
//! immutable network. Every swap or reset bumps the store version so callers
//! can tell snapshots apart.

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::info;
use thiserror::Error;

use crate::network::RoadNetwork;

/// Errors returned by [`NetworkStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No network is active.
    #[error("Graph not loaded")]
    NotLoaded,
    /// The city has not been loaded into the cache.
    #[error("no network cached for city {0}")]
    UnknownCity(String),
}

/// A request's view of the active network.
#[derive(Debug, Clone)]
pub struct NetworkSnapshot {
    network: Arc<RoadNetwork>,
    city: String,
    version: u64,
}

impl NetworkSnapshot {
    /// City the network belongs to.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Store version at the time the snapshot was taken.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Shared handle to the network.
    #[must_use]
    pub fn network(&self) -> Arc<RoadNetwork> {
        Arc::clone(&self.network)
    }
}

impl Deref for NetworkSnapshot {
    type Target = RoadNetwork;

    fn deref(&self) -> &Self::Target {
        &self.network
    }
}

#[derive(Debug, Default)]
struct State {
    cache: HashMap<String, Arc<RoadNetwork>>,
    active: Option<(String, Arc<RoadNetwork>)>,
    version: u64,
}

impl State {
    fn activate(&mut self, city: &str, network: Arc<RoadNetwork>) -> NetworkSnapshot {
        self.version = self.version.wrapping_add(1);
        self.active = Some((city.to_owned(), Arc::clone(&network)));
        info!(
            "activated network for {city} ({} nodes, {} edges, version {})",
            network.node_count(),
            network.edge_count(),
            self.version
        );
        NetworkSnapshot {
            network,
            city: city.to_owned(),
            version: self.version,
        }
    }
}

/// Cache of road networks with one active snapshot.
///
/// # Examples
///
/// ```rust
/// use roadtour_core::{NetworkStore, RoadNetwork, StoreError};
///
/// let store = NetworkStore::new();
/// assert_eq!(store.current().err(), Some(StoreError::NotLoaded));
///
/// let snapshot = store
///     .load_with("Lviv", || Ok::<_, StoreError>(RoadNetwork::default()))
///     .expect("loader succeeds");
/// assert_eq!(snapshot.city(), "Lviv");
/// assert_eq!(store.current().map(|s| s.version()), Ok(snapshot.version()));
/// ```
#[derive(Debug, Default)]
pub struct NetworkStore {
    state: RwLock<State>,
}

impl NetworkStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Activate `city`, running `loader` only if it is not cached yet.
    ///
    /// The loader runs without holding the store lock. If two threads load
    /// the same city concurrently the first network to arrive is kept.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error; the store is left unchanged.
    pub fn load_with<E, F>(&self, city: &str, loader: F) -> Result<NetworkSnapshot, E>
    where
        F: FnOnce() -> Result<RoadNetwork, E>,
    {
        let cached = self.read().cache.get(city).cloned();
        let network = match cached {
            Some(network) => network,
            None => {
                let loaded = Arc::new(loader()?);
                info!("loaded network for {city}");
                Arc::clone(
                    self.write()
                        .cache
                        .entry(city.to_owned())
                        .or_insert(loaded),
                )
            }
        };
        Ok(self.write().activate(city, network))
    }

    /// Cache `network` under `city`, replacing any earlier entry, without
    /// activating it.
    pub fn insert(&self, city: &str, network: RoadNetwork) {
        self.write()
            .cache
            .insert(city.to_owned(), Arc::new(network));
    }

    /// Make the cached network of `city` the active one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownCity`] if `city` is not cached.
    pub fn activate(&self, city: &str) -> Result<NetworkSnapshot, StoreError> {
        let mut state = self.write();
        let network = state
            .cache
            .get(city)
            .cloned()
            .ok_or_else(|| StoreError::UnknownCity(city.to_owned()))?;
        Ok(state.activate(city, network))
    }

    /// Deactivate the current network. Cached networks are kept.
    pub fn reset(&self) {
        let mut state = self.write();
        state.active = None;
        state.version = state.version.wrapping_add(1);
        info!("network store reset (version {})", state.version);
    }

    /// Snapshot of the active network.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotLoaded`] when no network is active.
    pub fn current(&self) -> Result<NetworkSnapshot, StoreError> {
        let state = self.read();
        state
            .active
            .as_ref()
            .map(|(city, network)| NetworkSnapshot {
                network: Arc::clone(network),
                city: city.clone(),
                version: state.version,
            })
            .ok_or(StoreError::NotLoaded)
    }

    /// Cached city names in lexical order.
    #[must_use]
    pub fn cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = self.read().cache.keys().cloned().collect();
        cities.sort();
        cities
    }

    /// Current store version.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.read().version
    }
}
