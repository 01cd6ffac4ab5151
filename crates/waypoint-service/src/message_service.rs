//! Message service trait definition.

use crate::dto::{MessageListResponse, MessageResponse, PostMessageRequest};
use async_trait::async_trait;
use waypoint_core::{ChatId, Interface, MessageId, PageRequest, WaypointResult};

/// Message service trait.
#[async_trait]
pub trait MessageService: Interface + Send + Sync {
    /// Posts a message into a chat. Both the chat and the author must exist.
    async fn post_message(&self, chat_id: ChatId, request: PostMessageRequest) -> WaypointResult<MessageResponse>;

    async fn get_message(&self, id: MessageId) -> WaypointResult<MessageResponse>;

    /// Lists a chat's messages, oldest first.
    async fn list_chat_messages(&self, chat_id: ChatId, page: PageRequest) -> WaypointResult<MessageListResponse>;

    async fn delete_message(&self, id: MessageId) -> WaypointResult<()>;
}
