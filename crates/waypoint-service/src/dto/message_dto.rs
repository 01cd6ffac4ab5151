//! Message-related DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;
use waypoint_core::rules::not_blank;
use waypoint_core::{ChatId, Message, MessageId, MessageType, Page, UserId};

/// Request to post a message into a chat.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PostMessageRequest {
    #[validate(
        custom(function = "not_blank", message = "Content must not be blank"),
        length(max = 10000, message = "Content cannot exceed 10000 characters")
    )]
    pub content: String,

    /// Defaults to `USER`.
    #[serde(default)]
    pub message_type: MessageType,

    /// Author of the message.
    pub user_id: UserId,
}

/// Message response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub id: MessageId,
    pub content: String,
    pub message_type: MessageType,
    pub send_date: DateTime<Utc>,
    pub chat_id: ChatId,
    pub user_id: UserId,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            content: message.content,
            message_type: message.message_type,
            send_date: message.send_date,
            chat_id: message.chat_id,
            user_id: message.user_id,
        }
    }
}

/// Message list response with pagination.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageListResponse {
    pub messages: Vec<MessageResponse>,
    pub page: usize,
    pub size: usize,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl From<Page<Message>> for MessageListResponse {
    fn from(page: Page<Message>) -> Self {
        let total_pages = page.total_pages();
        Self {
            messages: page.content.into_iter().map(MessageResponse::from).collect(),
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages,
        }
    }
}
