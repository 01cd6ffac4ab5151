//! Chat-related DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;
use waypoint_core::rules::not_blank;
use waypoint_core::{Chat, ChatId, Page, UserId};

/// Request to open a chat for a user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateChatRequest {
    #[validate(
        custom(function = "not_blank", message = "Title must not be blank"),
        length(max = 255, message = "Title cannot exceed 255 characters")
    )]
    pub title: String,

    pub user_id: UserId,
}

/// Request to rename a chat.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RenameChatRequest {
    #[validate(
        custom(function = "not_blank", message = "Title must not be blank"),
        length(max = 255, message = "Title cannot exceed 255 characters")
    )]
    pub title: String,
}

/// Chat response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub id: ChatId,
    pub title: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id,
            title: chat.title,
            user_id: chat.user_id,
            created_at: chat.created_at,
        }
    }
}

/// Chat list response with pagination.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatListResponse {
    pub chats: Vec<ChatResponse>,
    pub page: usize,
    pub size: usize,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl From<Page<Chat>> for ChatListResponse {
    fn from(page: Page<Chat>) -> Self {
        let total_pages = page.total_pages();
        Self {
            chats: page.content.into_iter().map(ChatResponse::from).collect(),
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_chat_request_rejects_blank_title() {
        let request = CreateChatRequest {
            title: "   ".to_string(),
            user_id: UserId::new(1),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_rename_chat_request_rejects_long_title() {
        let request = RenameChatRequest { title: "x".repeat(256) };
        assert!(request.validate().is_err());
        let request = RenameChatRequest { title: "Porto".to_string() };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_chat_response_serializes_iso_date() {
        let response = ChatResponse {
            id: ChatId::new(3),
            title: "Porto".to_string(),
            user_id: UserId::new(1),
            created_at: "2024-05-01T08:30:00Z".parse().unwrap(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"created_at\":\"2024-05-01T08:30:00Z\""));
        assert!(json.contains("\"user_id\":1"));
    }
}
