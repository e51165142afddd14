//! Depot-centred fleet planning over a road network.

use log::{debug, warn};
use roadtour_core::{NodeId, Rejection, RouteError, RoutingFailure, ShortestPathOracle};

use crate::savings::SavingsTable;

/// Client visiting orders for a fleet of trucks leaving one depot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetPlan {
    /// Start and end of every truck loop.
    pub depot: NodeId,
    /// Clients per truck, depot excluded, in truck order.
    pub routes: Vec<Vec<NodeId>>,
    /// Merged routes dropped because the fleet was too small.
    pub discarded: Vec<Vec<NodeId>>,
}

impl FleetPlan {
    /// Every client assigned to a truck, in truck order.
    pub fn served(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.routes.iter().flatten().copied()
    }
}

/// Clarke & Wright savings decomposition.
///
/// The first stop is the depot and the rest are clients. Routes are merged by
/// descending savings without capacity limits; when more routes survive than
/// there are trucks, the leading ones are kept and the rest are dropped.
///
/// # Examples
/// ```
/// use roadtour_core::DijkstraOracle;
/// use roadtour_core::test_support::{grid_network, grid_node};
/// use roadtour_solver_vrp::ClarkeWright;
///
/// let network = grid_network(3, 3, 100.0);
/// let oracle = DijkstraOracle::new(&network);
/// let stops = [
///     grid_node(3, 1, 1),
///     grid_node(3, 0, 0),
///     grid_node(3, 0, 2),
///     grid_node(3, 2, 2),
/// ];
/// let plan = ClarkeWright::new(2).plan(&oracle, &stops).expect("connected grid");
/// assert!(plan.routes.len() <= 2);
/// assert_eq!(plan.depot, stops[0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClarkeWright {
    trucks: usize,
}

impl ClarkeWright {
    /// Decomposer for a fleet of `trucks` vehicles.
    #[must_use]
    pub const fn new(trucks: usize) -> Self {
        Self { trucks }
    }

    /// Number of trucks available.
    #[must_use]
    pub const fn trucks(&self) -> usize {
        self.trucks
    }

    /// Split `stops[1..]` into at most `trucks` loops from `stops[0]`.
    ///
    /// # Errors
    ///
    /// Rejects an empty fleet and fewer than two stops. Returns a partial
    /// failure naming the first unreachable pair: depot to client, then
    /// client back to depot, client by client, and finally client to client.
    pub fn plan<O>(&self, oracle: &O, stops: &[NodeId]) -> Result<FleetPlan, RouteError>
    where
        O: ShortestPathOracle + ?Sized,
    {
        if self.trucks == 0 {
            return Err(Rejection::NoTrucks.into());
        }
        let Some((&depot, clients)) = stops.split_first() else {
            return Err(Rejection::TooFewStops.into());
        };
        if clients.is_empty() {
            return Err(Rejection::TooFewStops.into());
        }

        let table = distance_table(oracle, depot, clients)?;
        let merged = table.merge(self.trucks);
        let to_nodes = |routes: Vec<Vec<usize>>| -> Vec<Vec<NodeId>> {
            routes
                .into_iter()
                .map(|route| {
                    route
                        .into_iter()
                        .filter_map(|idx| clients.get(idx).copied())
                        .collect()
                })
                .collect()
        };
        let routes = to_nodes(merged.routes);
        let discarded = to_nodes(merged.discarded);
        if !discarded.is_empty() {
            warn!(
                "fleet of {} trucks cannot serve {} merged routes; dropping {:?}",
                self.trucks,
                routes.len() + discarded.len(),
                discarded
            );
        }
        debug!(
            "clarke-wright planned {} routes for {} clients",
            routes.len(),
            clients.len()
        );
        Ok(FleetPlan {
            depot,
            routes,
            discarded,
        })
    }
}

fn distance_table<O>(
    oracle: &O,
    depot: NodeId,
    clients: &[NodeId],
) -> Result<SavingsTable, RouteError>
where
    O: ShortestPathOracle + ?Sized,
{
    let outbound = oracle.distances_from(depot, clients);
    let mut targets = Vec::with_capacity(clients.len() + 1);
    targets.push(depot);
    targets.extend_from_slice(clients);
    let rows: Vec<Vec<Option<f64>>> = clients
        .iter()
        .map(|&client| oracle.distances_from(client, &targets))
        .collect();

    let mut from_depot = Vec::with_capacity(clients.len());
    let mut to_depot = Vec::with_capacity(clients.len());
    for (idx, &client) in clients.iter().enumerate() {
        let Some(out) = outbound.get(idx).copied().flatten() else {
            return Err(RoutingFailure::DepotUnreachable { depot, client }.into());
        };
        let Some(back) = reach(&rows, idx, 0) else {
            return Err(RoutingFailure::DepotReturnUnreachable { depot, client }.into());
        };
        from_depot.push(out);
        to_depot.push(back);
    }

    let mut between = Vec::with_capacity(clients.len());
    for (i, &from) in clients.iter().enumerate() {
        let mut resolved = Vec::with_capacity(clients.len());
        for (j, &to) in clients.iter().enumerate() {
            if from == to {
                resolved.push(0.0);
                continue;
            }
            let Some(distance) = reach(&rows, i, j + 1) else {
                return Err(RoutingFailure::ClientsUnreachable { from, to }.into());
            };
            resolved.push(distance);
        }
        between.push(resolved);
    }

    Ok(SavingsTable::from_parts(from_depot, to_depot, between))
}

fn reach(rows: &[Vec<Option<f64>>], row: usize, col: usize) -> Option<f64> {
    rows.get(row)?.get(col).copied().flatten()
}
