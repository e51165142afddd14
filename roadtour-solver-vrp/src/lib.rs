//! Multi-vehicle decomposition for roadtour.
//!
//! [`ClarkeWright`] splits a depot-centred request into at most `N` truck
//! loops using the Clarke & Wright savings heuristic. The merge itself runs
//! over a plain [`SavingsTable`] so it can be exercised without a road
//! network.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod fleet;
mod savings;

pub use fleet::{ClarkeWright, FleetPlan};
pub use savings::{InvalidTable, MergedRoutes, Saving, SavingsTable, keep_first};
