//! Message controller.

use super::parse_id;
use crate::{
    extractors::{PaginationQuery, ValidatedJson},
    responses::{created, no_content, ok, ApiResult, AppError, CreatedResult},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use tracing::debug;
use waypoint_core::{ChatId, MessageId};
use waypoint_service::{MessageListResponse, MessageResponse, PostMessageRequest};

/// Creates the message router.
pub fn router() -> Router<AppState> {
    Router::new().route("/:id", get(get_message).delete(delete_message))
}

/// Post a message into a chat.
#[utoipa::path(
    post,
    path = "/chats/{id}/messages",
    tag = "messages",
    params(("id" = i64, Path, description = "Chat ID")),
    request_body = PostMessageRequest,
    responses(
        (status = 201, description = "Message posted", body = MessageResponse),
        (status = 404, description = "Chat or author not found")
    )
)]
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<PostMessageRequest>,
) -> CreatedResult<MessageResponse> {
    debug!("Post message request to chat: {}", id);

    let chat_id: ChatId = parse_id("chat", &id)?;
    let response = state.message_service.post_message(chat_id, request).await?;
    Ok(created(response))
}

/// List a chat's messages, oldest first.
#[utoipa::path(
    get,
    path = "/chats/{id}/messages",
    tag = "messages",
    params(("id" = i64, Path, description = "Chat ID"), PaginationQuery),
    responses(
        (status = 200, description = "Page of messages", body = MessageListResponse),
        (status = 404, description = "Chat not found")
    )
)]
pub async fn list_chat_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<MessageListResponse> {
    let chat_id: ChatId = parse_id("chat", &id)?;
    ok(state
        .message_service
        .list_chat_messages(chat_id, pagination.into())
        .await?)
}

/// Get a message by ID.
#[utoipa::path(
    get,
    path = "/messages/{id}",
    tag = "messages",
    params(("id" = i64, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message found", body = MessageResponse),
        (status = 404, description = "Message not found")
    )
)]
pub async fn get_message(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<MessageResponse> {
    let message_id: MessageId = parse_id("message", &id)?;
    ok(state.message_service.get_message(message_id).await?)
}

/// Delete a message.
#[utoipa::path(
    delete,
    path = "/messages/{id}",
    tag = "messages",
    params(("id" = i64, Path, description = "Message ID")),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 404, description = "Message not found")
    )
)]
pub async fn delete_message(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, AppError> {
    debug!("Delete message request: {}", id);

    let message_id: MessageId = parse_id("message", &id)?;
    state.message_service.delete_message(message_id).await?;
    Ok(no_content())
}
