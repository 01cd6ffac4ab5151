//! Route entity and its ordered points.

use super::super::value_objects::RouteType;
use crate::{ChatId, RouteId, RoutePointId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A planned route attached to exactly one chat.
///
/// `chat_id` is set at creation and never changes. `updated_at` is
/// refreshed by [`Route::touch`] before every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub chat_id: ChatId,
    pub route_type: RouteType,
    pub updated_at: DateTime<Utc>,
    /// Points ordered by `position`.
    pub points: Vec<RoutePoint>,
}

impl Route {
    /// Creates an unsaved route with a fresh id.
    #[must_use]
    pub fn new(chat_id: ChatId, route_type: RouteType) -> Self {
        Self {
            id: RouteId::new(),
            chat_id,
            route_type,
            updated_at: Utc::now(),
            points: Vec::new(),
        }
    }

    /// Refreshes the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Sorts points by their stored position.
    pub fn sort_points(&mut self) {
        self.points.sort_by_key(|p| p.position);
    }
}

/// A stop on a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub id: RoutePointId,
    pub route_id: RouteId,
    /// Zero-based order within the route.
    pub position: i32,
    pub name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Insert payload for a route point. Position comes from list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoutePoint {
    pub name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl NewRoutePoint {
    #[must_use]
    pub fn new(name: impl Into<String>, address: Option<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            address,
            latitude,
            longitude,
        }
    }
}
