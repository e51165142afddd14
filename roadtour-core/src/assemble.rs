//! Turn solved orderings into rendered [`RouteResult`]s.

use std::collections::HashSet;

use log::debug;

use crate::error::{RouteError, RoutingFailure};
use crate::geometry::{Leg, build_leg};
use crate::network::{NodeId, RoadNetwork};
use crate::oracle::ShortestPathOracle;
use crate::route::{RouteResult, TravelModel, VehicleRoute};

/// Render a single-vehicle tour.
///
/// The main leg visits `order` front to back; the return leg closes the loop
/// from the last stop to the first.
///
/// # Errors
///
/// Returns a partial failure when either leg cannot be rendered. A main-leg
/// failure carries the visiting order; a return-leg failure additionally
/// carries the rendered main leg.
#[expect(
    clippy::float_arithmetic,
    reason = "total distance adds both leg lengths"
)]
pub fn assemble_tour<O>(
    network: &RoadNetwork,
    oracle: &O,
    order: &[NodeId],
    travel: &TravelModel,
) -> Result<RouteResult, RouteError>
where
    O: ShortestPathOracle + ?Sized,
{
    let main = build_leg(network, oracle, order)
        .map_err(|failure| RouteError::from(failure).with_ordered_points(order))?;
    let closing = match (order.last(), order.first()) {
        (Some(&last), Some(&first)) => [last, first],
        _ => return Ok(RouteResult::tour(Vec::new(), Vec::new(), Vec::new(), 0.0, 0.0, 0)),
    };
    let ret = match build_leg(network, oracle, &closing) {
        Ok(leg) => leg,
        Err(failure) => {
            return Err(RouteError::from(as_return_failure(failure))
                .with_ordered_points(order)
                .with_main_route(main.coordinates));
        }
    };
    let total = main.distance + ret.distance;
    let touched = distinct_nodes([&main, &ret]);
    debug!(
        "assembled tour over {} stops: {total:.1} m, {touched} nodes",
        order.len()
    );
    Ok(RouteResult::tour(
        order.to_vec(),
        main.coordinates,
        ret.coordinates,
        total,
        travel.minutes(total),
        touched,
    ))
}

/// Render a fleet solution, one `depot -> clients -> depot` loop per truck.
///
/// Trucks are numbered from one in the order of `routes`.
///
/// # Errors
///
/// Returns a partial failure, marked as a fleet failure, for the first loop
/// that cannot be rendered.
#[expect(
    clippy::float_arithmetic,
    reason = "fleet distance sums per-truck loop lengths"
)]
pub fn assemble_fleet<O>(
    network: &RoadNetwork,
    oracle: &O,
    depot: NodeId,
    routes: &[Vec<NodeId>],
    travel: &TravelModel,
) -> Result<RouteResult, RouteError>
where
    O: ShortestPathOracle + ?Sized,
{
    let mut legs = Vec::with_capacity(routes.len());
    let mut vehicles = Vec::with_capacity(routes.len());
    let mut total = 0.0;
    for (idx, clients) in routes.iter().enumerate() {
        let mut stops = Vec::with_capacity(clients.len() + 2);
        stops.push(depot);
        stops.extend_from_slice(clients);
        stops.push(depot);
        let leg = build_leg(network, oracle, &stops)
            .map_err(|failure| RouteError::from(failure).in_fleet())?;
        total += leg.distance;
        vehicles.push(VehicleRoute {
            truck_id: idx + 1,
            ordered_points: clients.clone(),
            coordinates: leg.coordinates.clone(),
            distance: leg.distance,
        });
        legs.push(leg);
    }
    let touched = distinct_nodes(&legs);
    debug!(
        "assembled fleet of {} trucks: {total:.1} m, {touched} nodes",
        vehicles.len()
    );
    Ok(RouteResult::fleet(
        vehicles,
        total,
        travel.minutes(total),
        touched,
    ))
}

const fn as_return_failure(failure: RoutingFailure) -> RoutingFailure {
    match failure {
        RoutingFailure::NoPath { from, to } => RoutingFailure::NoReturnPath { from, to },
        RoutingFailure::MissingEdge { from, to } => RoutingFailure::MissingReturnEdge { from, to },
        other => other,
    }
}

fn distinct_nodes<'a>(legs: impl IntoIterator<Item = &'a Leg>) -> usize {
    legs.into_iter()
        .flat_map(|leg| leg.nodes.iter().copied())
        .collect::<HashSet<_>>()
        .len()
}
