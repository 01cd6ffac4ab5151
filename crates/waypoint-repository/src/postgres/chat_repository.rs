//! PostgreSQL chat repository implementation.

use super::{log_page, total};
use crate::{traits::ChatRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;
use waypoint_core::{Chat, ChatId, NewChat, Page, PageRequest, UserId, WaypointResult};

/// PostgreSQL chat repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = ChatRepository)]
pub struct PgChatRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgChatRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ChatRow {
    id: i64,
    title: String,
    user_id: i64,
    created_at: DateTime<Utc>,
}

impl From<ChatRow> for Chat {
    fn from(row: ChatRow) -> Self {
        Self {
            id: ChatId::new(row.id),
            title: row.title,
            user_id: UserId::new(row.user_id),
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    async fn find_by_id(&self, id: ChatId) -> WaypointResult<Option<Chat>> {
        debug!("Finding chat by id: {}", id);

        let row = sqlx::query_as::<_, ChatRow>("SELECT id, title, user_id, created_at FROM chats WHERE id = $1")
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(Chat::from))
    }

    async fn exists(&self, id: ChatId) -> WaypointResult<bool> {
        let result: Option<i32> = sqlx::query_scalar("SELECT 1 FROM chats WHERE id = $1")
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(result.is_some())
    }

    async fn find_by_user(&self, user_id: UserId, page: PageRequest) -> WaypointResult<Page<Chat>> {
        log_page("chats", page);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chats WHERE user_id = $1")
            .bind(user_id.into_inner())
            .fetch_one(self.pool.inner())
            .await?;

        let rows = sqlx::query_as::<_, ChatRow>(
            r#"
            SELECT id, title, user_id, created_at
            FROM chats
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.into_inner())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(Page::new(rows.into_iter().map(Chat::from).collect(), page, total(count)))
    }

    async fn save(&self, chat: &NewChat) -> WaypointResult<Chat> {
        debug!("Saving chat for user {}", chat.user_id);

        let row = sqlx::query_as::<_, ChatRow>(
            r#"
            INSERT INTO chats (title, user_id)
            VALUES ($1, $2)
            RETURNING id, title, user_id, created_at
            "#,
        )
        .bind(&chat.title)
        .bind(chat.user_id.into_inner())
        .fetch_one(self.pool.inner())
        .await?;

        Ok(row.into())
    }

    async fn update_title(&self, id: ChatId, title: &str) -> WaypointResult<Option<Chat>> {
        debug!("Renaming chat: {}", id);

        let row = sqlx::query_as::<_, ChatRow>(
            "UPDATE chats SET title = $1 WHERE id = $2 RETURNING id, title, user_id, created_at",
        )
        .bind(title)
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Chat::from))
    }

    async fn delete(&self, id: ChatId) -> WaypointResult<bool> {
        debug!("Deleting chat: {}", id);

        let result = sqlx::query("DELETE FROM chats WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for PgChatRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgChatRepository").finish_non_exhaustive()
    }
}
