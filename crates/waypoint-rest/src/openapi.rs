//! OpenAPI documentation configuration.

use crate::controllers::{DependencyStatus, HealthResponse, ReadinessResponse};
use utoipa::OpenApi;
use waypoint_core::{
    ChatId, ErrorResponse, FieldError, MessageId, MessageType, RouteId, RoutePointId, RouteType, UserId, UserRole,
};
use waypoint_service::{
    ChangePasswordRequest, ChatListResponse, ChatResponse, CreateChatRequest, CreateRouteRequest, CreateUserRequest,
    MessageListResponse, MessageResponse, PostMessageRequest, RenameChatRequest, RoutePointRequest,
    RoutePointResponse, RouteResponse, UpdateRouteRequest, UpdateUserRequest, UpdateUserRoleRequest,
    UserListResponse, UserResponse,
};

/// OpenAPI documentation for the Waypoint API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Waypoint API",
        version = "1.0.0",
        description = "Users, chats, messages and routes of the Waypoint travel assistant",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // User endpoints
        crate::controllers::user_controller::list_users,
        crate::controllers::user_controller::create_user,
        crate::controllers::user_controller::get_user,
        crate::controllers::user_controller::update_user,
        crate::controllers::user_controller::delete_user,
        crate::controllers::user_controller::change_role,
        crate::controllers::user_controller::change_password,
        crate::controllers::user_controller::list_user_chats,
        // Chat endpoints
        crate::controllers::chat_controller::create_chat,
        crate::controllers::chat_controller::get_chat,
        crate::controllers::chat_controller::rename_chat,
        crate::controllers::chat_controller::delete_chat,
        // Message endpoints
        crate::controllers::message_controller::post_message,
        crate::controllers::message_controller::list_chat_messages,
        crate::controllers::message_controller::get_message,
        crate::controllers::message_controller::delete_message,
        // Route endpoints
        crate::controllers::route_controller::create_route,
        crate::controllers::route_controller::get_route_for_chat,
        crate::controllers::route_controller::update_route,
        crate::controllers::route_controller::delete_route,
        crate::controllers::route_controller::get_route,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            // Core types
            UserId,
            ChatId,
            MessageId,
            RouteId,
            RoutePointId,
            UserRole,
            MessageType,
            RouteType,
            ErrorResponse,
            FieldError,
            // User DTOs
            CreateUserRequest,
            UpdateUserRequest,
            UpdateUserRoleRequest,
            ChangePasswordRequest,
            UserResponse,
            UserListResponse,
            // Chat DTOs
            CreateChatRequest,
            RenameChatRequest,
            ChatResponse,
            ChatListResponse,
            // Message DTOs
            PostMessageRequest,
            MessageResponse,
            MessageListResponse,
            // Route DTOs
            CreateRouteRequest,
            UpdateRouteRequest,
            RoutePointRequest,
            RouteResponse,
            RoutePointResponse,
            // Health
            HealthResponse,
            ReadinessResponse,
            DependencyStatus,
        )
    ),
    tags(
        (name = "users", description = "User management endpoints"),
        (name = "chats", description = "Chat endpoints"),
        (name = "messages", description = "Chat message endpoints"),
        (name = "routes", description = "Route endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_resource_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in ["/users/{id}", "/chats/{id}/messages", "/chats/{id}/route", "/routes/{id}", "/ready"] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_openapi_serializes() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("RouteResponse"));
    }
}
