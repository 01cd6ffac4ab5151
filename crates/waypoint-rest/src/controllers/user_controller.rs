//! User management controller.

use super::parse_id;
use crate::{
    extractors::{PaginationQuery, ValidatedJson},
    responses::{created, no_content, ok, ApiResult, AppError, CreatedResult},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, put},
    Router,
};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;
use waypoint_core::{PageRequest, UserId, WaypointError};
use waypoint_service::{
    ChangePasswordRequest, ChatListResponse, CreateUserRequest, UpdateUserRequest, UpdateUserRoleRequest,
    UserListResponse, UserResponse,
};

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/role", patch(change_role))
        .route("/:id/password", put(change_password))
        .route("/:id/chats", get(list_user_chats))
}

/// Query parameters for listing users.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Zero-based page number.
    pub page: Option<usize>,
    /// Page size, capped at 100.
    pub size: Option<usize>,
    /// Restricts the listing to the user with this email.
    pub email: Option<String>,
}

/// List users, optionally filtered by email.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Page of users", body = UserListResponse)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<UserListResponse> {
    debug!("List users request");

    let page = PageRequest::from(PaginationQuery {
        page: query.page,
        size: query.size,
    });

    let Some(email) = query.email else {
        return ok(state.user_service.list_users(page).await?);
    };

    let users = match state.user_service.get_user_by_email(&email).await {
        Ok(user) => vec![user],
        Err(WaypointError::NotFound { .. }) => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    let total = users.len() as u64;
    ok(UserListResponse {
        users,
        page: page.page,
        size: page.size,
        total_elements: total,
        total_pages: total,
    })
}

/// Create a new user.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> CreatedResult<UserResponse> {
    debug!("Create user request: {}", request.login);

    let response = state.user_service.create_user(request).await?;
    Ok(created(response))
}

/// Get a user by ID.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<UserResponse> {
    debug!("Get user request: {}", id);

    let user_id: UserId = parse_id("user", &id)?;
    ok(state.user_service.get_user(user_id).await?)
}

/// Update a user's login and/or email.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    debug!("Update user request: {}", id);

    let user_id: UserId = parse_id("user", &id)?;
    ok(state.user_service.update_user(user_id, request).await?)
}

/// Delete a user with their chats, messages and routes.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, AppError> {
    debug!("Delete user request: {}", id);

    let user_id: UserId = parse_id("user", &id)?;
    state.user_service.delete_user(user_id).await?;

    Ok(no_content())
}

/// Change a user's role.
#[utoipa::path(
    patch,
    path = "/users/{id}/role",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn change_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRoleRequest>,
) -> ApiResult<UserResponse> {
    debug!("Change role request: {} -> {}", id, request.role);

    let user_id: UserId = parse_id("user", &id)?;
    ok(state.user_service.change_role(user_id, request).await?)
}

/// Change a user's password.
#[utoipa::path(
    put,
    path = "/users/{id}/password",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 401, description = "Current password does not match"),
        (status = 404, description = "User not found")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    debug!("Change password request: {}", id);

    let user_id: UserId = parse_id("user", &id)?;
    state.user_service.change_password(user_id, request).await?;
    Ok(no_content())
}

/// List a user's chats, newest first.
#[utoipa::path(
    get,
    path = "/users/{id}/chats",
    tag = "chats",
    params(("id" = i64, Path, description = "User ID"), PaginationQuery),
    responses(
        (status = 200, description = "Page of chats", body = ChatListResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_user_chats(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<ChatListResponse> {
    debug!("List chats request for user: {}", id);

    let user_id: UserId = parse_id("user", &id)?;
    ok(state.chat_service.list_user_chats(user_id, pagination.into()).await?)
}
