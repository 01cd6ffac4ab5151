//! Message service implementation.

use crate::dto::{MessageListResponse, MessageResponse, PostMessageRequest};
use crate::message_service::MessageService;
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};
use waypoint_core::{ChatId, MessageId, NewMessage, PageRequest, ValidateExt, WaypointError, WaypointResult};
use waypoint_repository::{ChatRepository, MessageRepository, UserRepository};

/// Message service component for Shaku DI.
///
/// Messages are not cached; they are append-mostly and read by page.
#[derive(Component)]
#[shaku(interface = MessageService)]
pub struct MessageServiceComponent {
    #[shaku(inject)]
    message_repository: Arc<dyn MessageRepository>,
    #[shaku(inject)]
    chat_repository: Arc<dyn ChatRepository>,
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
}

impl MessageServiceComponent {
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        chat_repository: Arc<dyn ChatRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            message_repository,
            chat_repository,
            user_repository,
        }
    }

    async fn ensure_chat(&self, chat_id: ChatId) -> WaypointResult<()> {
        if self.chat_repository.exists(chat_id).await? {
            Ok(())
        } else {
            Err(WaypointError::not_found("Chat", chat_id))
        }
    }
}

#[async_trait]
impl MessageService for MessageServiceComponent {
    async fn post_message(&self, chat_id: ChatId, request: PostMessageRequest) -> WaypointResult<MessageResponse> {
        debug!("Posting {} message to chat {}", request.message_type, chat_id);

        request.validate_request()?;
        self.ensure_chat(chat_id).await?;

        if self.user_repository.find_by_id(request.user_id).await?.is_none() {
            return Err(WaypointError::not_found("User", request.user_id));
        }

        let message = self
            .message_repository
            .save(&NewMessage::new(
                request.content,
                request.message_type,
                chat_id,
                request.user_id,
            ))
            .await?;

        info!("Message {} posted to chat {}", message.id, chat_id);
        Ok(MessageResponse::from(message))
    }

    async fn get_message(&self, id: MessageId) -> WaypointResult<MessageResponse> {
        debug!("Getting message: {}", id);

        self.message_repository
            .find_by_id(id)
            .await?
            .map(MessageResponse::from)
            .ok_or_else(|| WaypointError::not_found("Message", id))
    }

    async fn list_chat_messages(&self, chat_id: ChatId, page: PageRequest) -> WaypointResult<MessageListResponse> {
        debug!("Listing messages of chat {}, page: {}, size: {}", chat_id, page.page, page.size);

        self.ensure_chat(chat_id).await?;
        let messages = self.message_repository.find_by_chat(chat_id, page).await?;
        Ok(MessageListResponse::from(messages))
    }

    async fn delete_message(&self, id: MessageId) -> WaypointResult<()> {
        debug!("Deleting message: {}", id);

        if !self.message_repository.delete(id).await? {
            return Err(WaypointError::not_found("Message", id));
        }

        info!("Message deleted: {}", id);
        Ok(())
    }
}
