//! Chat controller.
//!
//! Messages and the route of a chat are addressed as sub-resources of
//! `/chats/{id}`; their handlers live in the message and route controllers.

use super::{message_controller, parse_id, route_controller};
use crate::{
    extractors::ValidatedJson,
    responses::{created, no_content, ok, ApiResult, AppError, CreatedResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tracing::debug;
use waypoint_core::ChatId;
use waypoint_service::{ChatResponse, CreateChatRequest, RenameChatRequest};

/// Creates the chat router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_chat))
        .route("/:id", get(get_chat).patch(rename_chat).delete(delete_chat))
        .route(
            "/:id/messages",
            post(message_controller::post_message).get(message_controller::list_chat_messages),
        )
        .route(
            "/:id/route",
            post(route_controller::create_route)
                .get(route_controller::get_route_for_chat)
                .put(route_controller::update_route)
                .delete(route_controller::delete_route),
        )
}

/// Open a chat for a user.
#[utoipa::path(
    post,
    path = "/chats",
    tag = "chats",
    request_body = CreateChatRequest,
    responses(
        (status = 201, description = "Chat created", body = ChatResponse),
        (status = 404, description = "Owner not found")
    )
)]
pub async fn create_chat(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateChatRequest>,
) -> CreatedResult<ChatResponse> {
    debug!("Create chat request for user: {}", request.user_id);

    let response = state.chat_service.create_chat(request).await?;
    Ok(created(response))
}

/// Get a chat by ID.
#[utoipa::path(
    get,
    path = "/chats/{id}",
    tag = "chats",
    params(("id" = i64, Path, description = "Chat ID")),
    responses(
        (status = 200, description = "Chat found", body = ChatResponse),
        (status = 404, description = "Chat not found")
    )
)]
pub async fn get_chat(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<ChatResponse> {
    let chat_id: ChatId = parse_id("chat", &id)?;
    ok(state.chat_service.get_chat(chat_id).await?)
}

/// Rename a chat.
#[utoipa::path(
    patch,
    path = "/chats/{id}",
    tag = "chats",
    params(("id" = i64, Path, description = "Chat ID")),
    request_body = RenameChatRequest,
    responses(
        (status = 200, description = "Chat renamed", body = ChatResponse),
        (status = 404, description = "Chat not found")
    )
)]
pub async fn rename_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<RenameChatRequest>,
) -> ApiResult<ChatResponse> {
    debug!("Rename chat request: {}", id);

    let chat_id: ChatId = parse_id("chat", &id)?;
    ok(state.chat_service.rename_chat(chat_id, request).await?)
}

/// Delete a chat with its messages and route.
#[utoipa::path(
    delete,
    path = "/chats/{id}",
    tag = "chats",
    params(("id" = i64, Path, description = "Chat ID")),
    responses(
        (status = 204, description = "Chat deleted"),
        (status = 404, description = "Chat not found")
    )
)]
pub async fn delete_chat(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, AppError> {
    debug!("Delete chat request: {}", id);

    let chat_id: ChatId = parse_id("chat", &id)?;
    state.chat_service.delete_chat(chat_id).await?;
    Ok(no_content())
}
