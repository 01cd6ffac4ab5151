//! Chat service trait definition.

use crate::dto::{ChatListResponse, ChatResponse, CreateChatRequest, RenameChatRequest};
use async_trait::async_trait;
use waypoint_core::{ChatId, Interface, PageRequest, UserId, WaypointResult};

/// Chat service trait.
#[async_trait]
pub trait ChatService: Interface + Send + Sync {
    /// Opens a chat for an existing user.
    async fn create_chat(&self, request: CreateChatRequest) -> WaypointResult<ChatResponse>;

    async fn get_chat(&self, id: ChatId) -> WaypointResult<ChatResponse>;

    /// Lists a user's chats, newest first.
    async fn list_user_chats(&self, user_id: UserId, page: PageRequest) -> WaypointResult<ChatListResponse>;

    async fn rename_chat(&self, id: ChatId, request: RenameChatRequest) -> WaypointResult<ChatResponse>;

    /// Deletes a chat with its messages and route.
    async fn delete_chat(&self, id: ChatId) -> WaypointResult<()>;
}
