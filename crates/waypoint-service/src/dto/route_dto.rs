//! Route-related DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;
use waypoint_core::rules::not_blank;
use waypoint_core::{ChatId, NewRoutePoint, Route, RouteId, RoutePoint, RoutePointId, RouteType};

/// Upper bound on points per route.
pub const MAX_ROUTE_POINTS: u64 = 200;

/// One stop of a route, in travel order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RoutePointRequest {
    #[validate(
        custom(function = "not_blank", message = "Point name must not be blank"),
        length(max = 255, message = "Point name cannot exceed 255 characters")
    )]
    pub name: String,

    #[validate(length(max = 512, message = "Address cannot exceed 512 characters"))]
    pub address: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
}

impl From<RoutePointRequest> for NewRoutePoint {
    fn from(point: RoutePointRequest) -> Self {
        let address = point
            .address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        Self::new(point.name.trim(), address, point.latitude, point.longitude)
    }
}

/// Converts request points into storable points, keeping their order.
#[must_use]
pub fn into_new_points(points: Vec<RoutePointRequest>) -> Vec<NewRoutePoint> {
    points.into_iter().map(NewRoutePoint::from).collect()
}

/// Request to attach a route to a chat.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRouteRequest {
    /// Defaults to `PEDESTRIAN`.
    #[serde(default)]
    pub route_type: RouteType,

    #[serde(default)]
    #[validate(length(max = MAX_ROUTE_POINTS, message = "Too many route points"), nested)]
    pub points: Vec<RoutePointRequest>,
}

/// Request to change a route's type and/or replace its points.
///
/// When `points` is present it replaces the stored list entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRouteRequest {
    pub route_type: Option<RouteType>,

    #[validate(length(max = MAX_ROUTE_POINTS, message = "Too many route points"), nested)]
    pub points: Option<Vec<RoutePointRequest>>,
}

/// Route point response DTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoutePointResponse {
    pub id: RoutePointId,
    pub position: i32,
    pub name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<RoutePoint> for RoutePointResponse {
    fn from(point: RoutePoint) -> Self {
        Self {
            id: point.id,
            position: point.position,
            name: point.name,
            address: point.address,
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

/// Route response DTO. Points are ordered by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RouteResponse {
    pub id: RouteId,
    pub chat_id: ChatId,
    pub route_type: RouteType,
    pub updated_at: DateTime<Utc>,
    pub points: Vec<RoutePointResponse>,
}

impl From<Route> for RouteResponse {
    fn from(mut route: Route) -> Self {
        route.sort_points();
        Self {
            id: route.id,
            chat_id: route.chat_id,
            route_type: route.route_type,
            updated_at: route.updated_at,
            points: route.points.into_iter().map(RoutePointResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(name: &str, latitude: f64, longitude: f64) -> RoutePointRequest {
        RoutePointRequest {
            name: name.to_string(),
            address: None,
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_route_point_rejects_out_of_range_coordinates() {
        assert!(point("Ok", 55.75, 37.61).validate().is_ok());
        assert!(point("North of north", 91.0, 0.0).validate().is_err());
        assert!(point("Off the map", 0.0, -180.5).validate().is_err());
    }

    #[test]
    fn test_create_route_validates_nested_points() {
        let request = CreateRouteRequest {
            route_type: RouteType::Bicycle,
            points: vec![point("Start", 10.0, 10.0), point(" ", 10.0, 10.0)],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_route_defaults() {
        let request: CreateRouteRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.route_type, RouteType::Pedestrian);
        assert!(request.points.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_route_request_distinguishes_missing_points() {
        let keep: UpdateRouteRequest = serde_json::from_str(r#"{"route_type":"AUTO"}"#).unwrap();
        assert!(keep.points.is_none());

        let clear: UpdateRouteRequest = serde_json::from_str(r#"{"points":[]}"#).unwrap();
        assert_eq!(clear.points.map(|p| p.len()), Some(0));
    }

    #[test]
    fn test_point_conversion_trims_and_drops_blank_address() {
        let new_point = NewRoutePoint::from(RoutePointRequest {
            name: "  Red Square ".to_string(),
            address: Some("   ".to_string()),
            latitude: 55.75,
            longitude: 37.62,
        });
        assert_eq!(new_point.name, "Red Square");
        assert!(new_point.address.is_none());
    }

    #[test]
    fn test_route_response_orders_points() {
        let mut route = Route::new(ChatId::new(1), RouteType::Auto);
        for (id, position) in [(10, 1), (11, 0)] {
            route.points.push(RoutePoint {
                id: RoutePointId::new(id),
                route_id: route.id,
                position,
                name: format!("p{position}"),
                address: None,
                latitude: 0.0,
                longitude: 0.0,
            });
        }
        let response = RouteResponse::from(route);
        assert_eq!(response.points[0].position, 0);
        assert_eq!(response.points[1].id, RoutePointId::new(10));
    }
}
