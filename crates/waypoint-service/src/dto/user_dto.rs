//! User-related DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;
use waypoint_core::rules::{valid_email, valid_login};
use waypoint_core::{Page, User, UserId, UserRole};

/// Request to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(custom(function = "valid_login", message = "Login must be 3-64 characters without spaces"))]
    pub login: String,

    #[validate(custom(function = "valid_email", message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    /// Defaults to `USER`.
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// Request to update a user's login and/or email.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(custom(function = "valid_login", message = "Login must be 3-64 characters without spaces"))]
    pub login: Option<String>,

    #[validate(custom(function = "valid_email", message = "Invalid email address"))]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    /// Returns true if the request changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.login.is_none() && self.email.is_none()
    }
}

/// Request to change a user's role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRoleRequest {
    pub role: UserRole,
}

/// Request to change password.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,

    #[validate(length(min = 8, max = 128, message = "New password must be 8-128 characters"))]
    pub new_password: String,
}

/// User response DTO. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub login: String,
    pub email: String,
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            login: user.login,
            email: user.email.into(),
            role: user.role,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            login: user.login.clone(),
            email: user.email.to_string(),
            role: user.role,
        }
    }
}

/// User list response with pagination.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub page: usize,
    pub size: usize,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl From<Page<User>> for UserListResponse {
    fn from(page: Page<User>) -> Self {
        let total_pages = page.total_pages();
        Self {
            users: page.content.into_iter().map(UserResponse::from).collect(),
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages,
        }
    }
}
