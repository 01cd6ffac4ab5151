//! Message entity.

use super::super::value_objects::MessageType;
use crate::{ChatId, MessageId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single line in a chat. `send_date` is fixed at insert time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub message_type: MessageType,
    pub send_date: DateTime<Utc>,
    pub chat_id: ChatId,
    pub user_id: UserId,
}

/// Insert payload for a message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub content: String,
    pub message_type: MessageType,
    pub chat_id: ChatId,
    pub user_id: UserId,
}

impl NewMessage {
    #[must_use]
    pub fn new(content: impl Into<String>, message_type: MessageType, chat_id: ChatId, user_id: UserId) -> Self {
        Self {
            content: content.into(),
            message_type,
            chat_id,
            user_id,
        }
    }

    /// Materialises the message with its assigned id and send date.
    #[must_use]
    pub fn into_message(self, id: MessageId, send_date: DateTime<Utc>) -> Message {
        Message {
            id,
            content: self.content,
            message_type: self.message_type,
            send_date,
            chat_id: self.chat_id,
            user_id: self.user_id,
        }
    }
}
