//! Chat entity.

use crate::{ChatId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A conversation owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub title: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Chat {
    /// Checks whether the chat belongs to the given user.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Insert payload for a chat.
#[derive(Debug, Clone)]
pub struct NewChat {
    pub title: String,
    pub user_id: UserId,
}

impl NewChat {
    #[must_use]
    pub fn new(title: impl Into<String>, user_id: UserId) -> Self {
        Self {
            title: title.into().trim().to_string(),
            user_id,
        }
    }
}
