//! User service trait definition.

use crate::dto::{
    ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, UpdateUserRoleRequest, UserListResponse,
    UserResponse,
};
use async_trait::async_trait;
use waypoint_core::{Interface, PageRequest, UserId, WaypointResult};

/// User service trait.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Creates a new user. Duplicate emails are a conflict.
    async fn create_user(&self, request: CreateUserRequest) -> WaypointResult<UserResponse>;

    /// Gets a user by ID.
    async fn get_user(&self, id: UserId) -> WaypointResult<UserResponse>;

    /// Gets a user by email, compared after normalisation.
    async fn get_user_by_email(&self, email: &str) -> WaypointResult<UserResponse>;

    /// Lists all users with pagination.
    async fn list_users(&self, page: PageRequest) -> WaypointResult<UserListResponse>;

    /// Updates a user's login and/or email.
    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> WaypointResult<UserResponse>;

    /// Changes a user's role.
    async fn change_role(&self, id: UserId, request: UpdateUserRoleRequest) -> WaypointResult<UserResponse>;

    /// Changes a user's password after verifying the current one.
    async fn change_password(&self, id: UserId, request: ChangePasswordRequest) -> WaypointResult<()>;

    /// Deletes a user with their chats, messages and routes.
    async fn delete_user(&self, id: UserId) -> WaypointResult<()>;

    /// Checks if an email is registered.
    async fn email_exists(&self, email: &str) -> WaypointResult<bool>;
}
