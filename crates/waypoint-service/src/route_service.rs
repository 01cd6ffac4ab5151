//! Route service trait definition.

use crate::dto::{CreateRouteRequest, RouteResponse, UpdateRouteRequest};
use async_trait::async_trait;
use waypoint_core::{ChatId, Interface, RouteId, WaypointResult};

/// Route service trait.
///
/// A chat has at most one route, so writes are addressed by chat.
#[async_trait]
pub trait RouteService: Interface + Send + Sync {
    /// Attaches a route to a chat. A second route is a conflict.
    async fn create_route(&self, chat_id: ChatId, request: CreateRouteRequest) -> WaypointResult<RouteResponse>;

    async fn get_route(&self, id: RouteId) -> WaypointResult<RouteResponse>;

    async fn get_route_for_chat(&self, chat_id: ChatId) -> WaypointResult<RouteResponse>;

    /// Changes the route type and/or replaces the point list.
    async fn update_route(&self, chat_id: ChatId, request: UpdateRouteRequest) -> WaypointResult<RouteResponse>;

    async fn delete_route(&self, chat_id: ChatId) -> WaypointResult<()>;
}
