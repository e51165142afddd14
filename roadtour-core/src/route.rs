//! Externally visible outcome of a route computation.
//!
//! A [`RouteResult`] is built once per request and never mutated afterwards.
//! Tour results carry main and return leg geometry; fleet results carry one
//! [`VehicleRoute`] per truck instead.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::network::{LatLon, NodeId};

/// Overall outcome of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RouteStatus {
    /// The route was computed and rendered.
    Success,
    /// Some pair of nodes could not be joined.
    PartialSuccess,
    /// The request was rejected.
    Error,
}

/// Constant average-speed travel time model.
///
/// # Examples
/// ```
/// use roadtour_core::TravelModel;
///
/// let model = TravelModel::default();
/// assert_eq!(model.minutes(25_000.0), 30.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TravelModel {
    /// Average speed in kilometres per hour.
    pub average_speed_kmh: f64,
}

impl Default for TravelModel {
    fn default() -> Self {
        Self {
            average_speed_kmh: 50.0,
        }
    }
}

impl TravelModel {
    /// Estimated travel time in minutes for `distance` metres.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "travel time converts metres to minutes at a constant speed"
    )]
    pub fn minutes(&self, distance: f64) -> f64 {
        distance / 1000.0 / self.average_speed_kmh * 60.0
    }
}

/// One truck's share of a fleet solution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VehicleRoute {
    /// One-based truck number.
    pub truck_id: usize,
    /// Clients in visiting order, depot excluded.
    pub ordered_points: Vec<NodeId>,
    /// Rendered `depot -> clients -> depot` polyline.
    pub coordinates: Vec<LatLon>,
    /// Road distance of this truck's loop in metres.
    pub distance: f64,
}

/// Final response for one request.
///
/// Field names follow the wire format consumed by map front ends.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteResult {
    /// Overall outcome.
    pub status: RouteStatus,
    /// Human-readable reason for a non-success outcome.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub message: Option<String>,
    /// Stops in visiting order (tour results only).
    #[cfg_attr(feature = "serde", serde(default))]
    pub ordered_points: Vec<NodeId>,
    /// Outbound leg through every stop.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub main_route_coordinates: Option<Vec<LatLon>>,
    /// Leg from the last stop back to the first.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub return_route_coordinates: Option<Vec<LatLon>>,
    /// Per-truck routes of a fleet solution.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub vrp_routes: Option<Vec<VehicleRoute>>,
    /// Total road distance in metres.
    pub total_distance: Option<f64>,
    /// Estimated travel time in minutes.
    pub travel_time: Option<f64>,
    /// Distinct road-network nodes touched by the rendered route.
    pub num_nodes_in_route: usize,
}

impl RouteResult {
    /// A successful single-vehicle tour.
    #[must_use]
    pub fn tour(
        ordered_points: Vec<NodeId>,
        main: Vec<LatLon>,
        ret: Vec<LatLon>,
        total_distance: f64,
        travel_time: f64,
        num_nodes_in_route: usize,
    ) -> Self {
        Self {
            status: RouteStatus::Success,
            message: None,
            ordered_points,
            main_route_coordinates: Some(main),
            return_route_coordinates: Some(ret),
            vrp_routes: None,
            total_distance: Some(total_distance),
            travel_time: Some(travel_time),
            num_nodes_in_route,
        }
    }

    /// A successful fleet solution.
    #[must_use]
    pub fn fleet(
        routes: Vec<VehicleRoute>,
        total_distance: f64,
        travel_time: f64,
        num_nodes_in_route: usize,
    ) -> Self {
        Self {
            status: RouteStatus::Success,
            message: None,
            ordered_points: Vec::new(),
            main_route_coordinates: None,
            return_route_coordinates: None,
            vrp_routes: Some(routes),
            total_distance: Some(total_distance),
            travel_time: Some(travel_time),
            num_nodes_in_route,
        }
    }

    /// Fold a failed computation into a response.
    ///
    /// Rejections become [`RouteStatus::Error`]; unreachable pairs become
    /// [`RouteStatus::PartialSuccess`]. A tour failure carries whatever
    /// ordering and main-leg geometry was known and an empty return leg. A
    /// fleet failure carries an empty `vrp_routes` list and no tour fields.
    #[must_use]
    pub fn failed(err: &RouteError) -> Self {
        let mut result = Self {
            status: RouteStatus::Error,
            message: Some(err.to_string()),
            ordered_points: Vec::new(),
            main_route_coordinates: None,
            return_route_coordinates: None,
            vrp_routes: None,
            total_distance: None,
            travel_time: None,
            num_nodes_in_route: 0,
        };
        if let RouteError::PartialFailure(partial) = err {
            result.status = RouteStatus::PartialSuccess;
            if partial.fleet {
                result.vrp_routes = Some(Vec::new());
            } else {
                result.ordered_points.clone_from(&partial.ordered_points);
                result.main_route_coordinates = Some(partial.main_route_coordinates.clone());
                result.return_route_coordinates = Some(Vec::new());
            }
        }
        result
    }

    /// Whether the request succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == RouteStatus::Success
    }
}

impl From<Result<Self, RouteError>> for RouteResult {
    fn from(outcome: Result<Self, RouteError>) -> Self {
        outcome.unwrap_or_else(|err| Self::failed(&err))
    }
}
