//! Route controller.

use super::parse_id;
use crate::{
    extractors::ValidatedJson,
    responses::{created, no_content, ok, ApiResult, AppError, CreatedResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use tracing::debug;
use waypoint_core::{ChatId, RouteId};
use waypoint_service::{CreateRouteRequest, RouteResponse, UpdateRouteRequest};

/// Creates the router for routes addressed by their own ID.
pub fn router() -> Router<AppState> {
    Router::new().route("/:id", get(get_route))
}

/// Attach a route to a chat.
#[utoipa::path(
    post,
    path = "/chats/{id}/route",
    tag = "routes",
    params(("id" = i64, Path, description = "Chat ID")),
    request_body = CreateRouteRequest,
    responses(
        (status = 201, description = "Route created", body = RouteResponse),
        (status = 404, description = "Chat not found"),
        (status = 409, description = "Chat already has a route")
    )
)]
pub async fn create_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateRouteRequest>,
) -> CreatedResult<RouteResponse> {
    debug!("Create route request for chat: {}", id);

    let chat_id: ChatId = parse_id("chat", &id)?;
    let response = state.route_service.create_route(chat_id, request).await?;
    Ok(created(response))
}

/// Get the route of a chat.
#[utoipa::path(
    get,
    path = "/chats/{id}/route",
    tag = "routes",
    params(("id" = i64, Path, description = "Chat ID")),
    responses(
        (status = 200, description = "Route found", body = RouteResponse),
        (status = 404, description = "Chat has no route")
    )
)]
pub async fn get_route_for_chat(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<RouteResponse> {
    let chat_id: ChatId = parse_id("chat", &id)?;
    ok(state.route_service.get_route_for_chat(chat_id).await?)
}

/// Change the route type and/or replace its points.
#[utoipa::path(
    put,
    path = "/chats/{id}/route",
    tag = "routes",
    params(("id" = i64, Path, description = "Chat ID")),
    request_body = UpdateRouteRequest,
    responses(
        (status = 200, description = "Route updated", body = RouteResponse),
        (status = 404, description = "Chat has no route")
    )
)]
pub async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateRouteRequest>,
) -> ApiResult<RouteResponse> {
    debug!("Update route request for chat: {}", id);

    let chat_id: ChatId = parse_id("chat", &id)?;
    ok(state.route_service.update_route(chat_id, request).await?)
}

/// Delete the route of a chat.
#[utoipa::path(
    delete,
    path = "/chats/{id}/route",
    tag = "routes",
    params(("id" = i64, Path, description = "Chat ID")),
    responses(
        (status = 204, description = "Route deleted"),
        (status = 404, description = "Chat has no route")
    )
)]
pub async fn delete_route(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, AppError> {
    debug!("Delete route request for chat: {}", id);

    let chat_id: ChatId = parse_id("chat", &id)?;
    state.route_service.delete_route(chat_id).await?;
    Ok(no_content())
}

/// Get a route by ID.
#[utoipa::path(
    get,
    path = "/routes/{id}",
    tag = "routes",
    params(("id" = String, Path, description = "Route UUID")),
    responses(
        (status = 200, description = "Route found", body = RouteResponse),
        (status = 404, description = "Route not found")
    )
)]
pub async fn get_route(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<RouteResponse> {
    let route_id: RouteId = parse_id("route", &id)?;
    ok(state.route_service.get_route(route_id).await?)
}
