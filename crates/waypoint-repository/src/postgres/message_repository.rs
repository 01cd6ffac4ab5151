//! PostgreSQL message repository implementation.

use super::{corrupt_column, log_page, total};
use crate::{traits::MessageRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;
use waypoint_core::{
    ChatId, Message, MessageId, MessageType, NewMessage, Page, PageRequest, UserId, WaypointError, WaypointResult,
};

/// PostgreSQL message repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = MessageRepository)]
pub struct PgMessageRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgMessageRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MessageRow {
    id: i64,
    content: String,
    message_type: String,
    send_date: DateTime<Utc>,
    chat_id: i64,
    user_id: i64,
}

impl TryFrom<MessageRow> for Message {
    type Error = WaypointError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MessageId::new(row.id),
            content: row.content,
            message_type: row
                .message_type
                .parse::<MessageType>()
                .map_err(|e| corrupt_column("message_type", e))?,
            send_date: row.send_date,
            chat_id: ChatId::new(row.chat_id),
            user_id: UserId::new(row.user_id),
        })
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn find_by_id(&self, id: MessageId) -> WaypointResult<Option<Message>> {
        debug!("Finding message by id: {}", id);

        let row = sqlx::query_as::<_, MessageRow>(
            "SELECT id, content, message_type, send_date, chat_id, user_id FROM messages WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Message::try_from).transpose()
    }

    async fn find_by_chat(&self, chat_id: ChatId, page: PageRequest) -> WaypointResult<Page<Message>> {
        log_page("messages", page);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE chat_id = $1")
            .bind(chat_id.into_inner())
            .fetch_one(self.pool.inner())
            .await?;

        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, content, message_type, send_date, chat_id, user_id
            FROM messages
            WHERE chat_id = $1
            ORDER BY send_date, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(chat_id.into_inner())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.inner())
        .await?;

        let messages = rows
            .into_iter()
            .map(Message::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(messages, page, total(count)))
    }

    async fn save(&self, message: &NewMessage) -> WaypointResult<Message> {
        debug!("Saving message in chat {}", message.chat_id);

        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (content, message_type, chat_id, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, content, message_type, send_date, chat_id, user_id
            "#,
        )
        .bind(&message.content)
        .bind(message.message_type.as_str())
        .bind(message.chat_id.into_inner())
        .bind(message.user_id.into_inner())
        .fetch_one(self.pool.inner())
        .await?;

        Message::try_from(row)
    }

    async fn delete(&self, id: MessageId) -> WaypointResult<bool> {
        debug!("Deleting message: {}", id);

        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for PgMessageRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgMessageRepository").finish_non_exhaustive()
    }
}
