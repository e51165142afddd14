//! Clarke & Wright savings merge over a distance table.
//!
//! Clients are numbered `0..n`. Every client starts on its own route; the
//! savings `s(i, j) = d(depot, i) + d(depot, j) - d(i, j)` of every ordered
//! pair of distinct clients are processed from largest to smallest, and the
//! route ending in `i` absorbs the route starting with `j` when the two differ.

use thiserror::Error;

/// Shortest-path distances among a depot and its clients.
#[derive(Debug, Clone, PartialEq)]
pub struct SavingsTable {
    from_depot: Vec<f64>,
    to_depot: Vec<f64>,
    between: Vec<Vec<f64>>,
}

/// Distance rows did not describe the same number of clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("savings table rows must all cover {clients} clients")]
pub struct InvalidTable {
    /// Number of clients implied by the depot row.
    pub clients: usize,
}

/// One entry of the savings list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saving {
    /// Client whose route would be extended.
    pub from: usize,
    /// Client whose route would be appended.
    pub to: usize,
    /// Distance saved by the merge.
    pub value: f64,
}

/// Result of merging routes under a truck limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRoutes {
    /// Surviving routes as client indices, in route creation order.
    pub routes: Vec<Vec<usize>>,
    /// Merged routes dropped because they exceeded the truck limit.
    pub discarded: Vec<Vec<usize>>,
}

impl SavingsTable {
    /// Build a table from depot-to-client, client-to-depot and
    /// client-to-client distances.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTable`] if the rows disagree on the client count.
    pub fn new(
        from_depot: Vec<f64>,
        to_depot: Vec<f64>,
        between: Vec<Vec<f64>>,
    ) -> Result<Self, InvalidTable> {
        let clients = from_depot.len();
        if to_depot.len() != clients
            || between.len() != clients
            || between.iter().any(|row| row.len() != clients)
        {
            return Err(InvalidTable { clients });
        }
        Ok(Self::from_parts(from_depot, to_depot, between))
    }

    /// Assemble rows already known to share one client count.
    pub(crate) const fn from_parts(
        from_depot: Vec<f64>,
        to_depot: Vec<f64>,
        between: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            from_depot,
            to_depot,
            between,
        }
    }

    /// Number of clients.
    #[must_use]
    pub const fn clients(&self) -> usize {
        self.from_depot.len()
    }

    /// Distance from client `client` back to the depot.
    #[must_use]
    pub fn to_depot(&self, client: usize) -> Option<f64> {
        self.to_depot.get(client).copied()
    }

    /// Savings of every ordered pair of distinct clients, largest first.
    ///
    /// Equal savings keep their generation order: by `from`, then by `to`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "savings combine floating-point distances"
    )]
    pub fn savings(&self) -> Vec<Saving> {
        let mut savings = Vec::new();
        for (from, row) in self.between.iter().enumerate() {
            for (to, &direct) in row.iter().enumerate() {
                if from == to {
                    continue;
                }
                let (Some(&out_from), Some(&out_to)) =
                    (self.from_depot.get(from), self.from_depot.get(to))
                else {
                    continue;
                };
                savings.push(Saving {
                    from,
                    to,
                    value: out_from + out_to - direct,
                });
            }
        }
        savings.sort_by(|a, b| b.value.total_cmp(&a.value));
        savings
    }

    /// Merge singleton routes by savings and keep the first `trucks` routes.
    ///
    /// Excess routes are cut by position, not by length or savings.
    #[must_use]
    pub fn merge(&self, trucks: usize) -> MergedRoutes {
        let clients = self.clients();
        let mut routes: Vec<Vec<usize>> = (0..clients).map(|client| vec![client]).collect();
        let mut route_of: Vec<usize> = (0..clients).collect();

        for saving in self.savings() {
            let (Some(&r1), Some(&r2)) = (route_of.get(saving.from), route_of.get(saving.to))
            else {
                continue;
            };
            if r1 == r2 {
                continue;
            }
            let ends_with_from =
                routes.get(r1).and_then(|route| route.last()) == Some(&saving.from);
            let starts_with_to =
                routes.get(r2).and_then(|route| route.first()) == Some(&saving.to);
            if !(ends_with_from && starts_with_to) {
                continue;
            }
            let moved = routes.get_mut(r2).map(std::mem::take).unwrap_or_default();
            for &client in &moved {
                if let Some(slot) = route_of.get_mut(client) {
                    *slot = r1;
                }
            }
            if let Some(route) = routes.get_mut(r1) {
                route.extend(moved);
            }
        }

        keep_first(routes, trucks)
    }
}

/// Drop empty routes, then keep the first `trucks` in their current order.
#[must_use]
pub fn keep_first(mut routes: Vec<Vec<usize>>, trucks: usize) -> MergedRoutes {
    routes.retain(|route| !route.is_empty());
    let discarded = if routes.len() > trucks {
        routes.split_off(trucks)
    } else {
        Vec::new()
    };
    MergedRoutes { routes, discarded }
}
