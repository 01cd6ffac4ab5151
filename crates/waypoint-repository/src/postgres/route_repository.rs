//! PostgreSQL route repository implementation.
//!
//! A route and its points are written in one transaction. Replacing the
//! point list deletes every previously stored point for the route, so points
//! detached from a route never outlive it.

use super::corrupt_column;
use crate::{
    traits::{RouteRef, RouteRepository},
    DatabasePoolInterface,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::{FromRow, PgConnection};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use waypoint_core::{
    ChatId, NewRoutePoint, Route, RouteId, RoutePoint, RoutePointId, RouteType, UserId, WaypointError,
    WaypointResult,
};

/// PostgreSQL route repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = RouteRepository)]
pub struct PgRouteRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgRouteRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RouteRow {
    id: Uuid,
    chat_id: i64,
    route_type: String,
    updated_at: DateTime<Utc>,
}

impl RouteRow {
    fn into_route(self, points: Vec<RoutePoint>) -> WaypointResult<Route> {
        Ok(Route {
            id: RouteId::from_uuid(self.id),
            chat_id: ChatId::new(self.chat_id),
            route_type: self
                .route_type
                .parse::<RouteType>()
                .map_err(|e| corrupt_column("route_type", e))?,
            updated_at: self.updated_at,
            points,
        })
    }
}

#[derive(Debug, FromRow)]
struct RoutePointRow {
    id: i64,
    route_id: Uuid,
    position: i32,
    name: String,
    address: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl From<RoutePointRow> for RoutePoint {
    fn from(row: RoutePointRow) -> Self {
        Self {
            id: RoutePointId::new(row.id),
            route_id: RouteId::from_uuid(row.route_id),
            position: row.position,
            name: row.name,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

async fn load_points(conn: &mut PgConnection, route_id: RouteId) -> WaypointResult<Vec<RoutePoint>> {
    let rows = sqlx::query_as::<_, RoutePointRow>(
        r#"
        SELECT id, route_id, position, name, address, latitude, longitude
        FROM route_points
        WHERE route_id = $1
        ORDER BY position
        "#,
    )
    .bind(route_id.into_inner())
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(RoutePoint::from).collect())
}

async fn insert_points(
    conn: &mut PgConnection,
    route_id: RouteId,
    points: &[NewRoutePoint],
) -> WaypointResult<Vec<RoutePoint>> {
    let mut saved = Vec::with_capacity(points.len());

    for (position, point) in points.iter().enumerate() {
        let position =
            i32::try_from(position).map_err(|_| WaypointError::validation("Route has too many points"))?;

        let row = sqlx::query_as::<_, RoutePointRow>(
            r#"
            INSERT INTO route_points (route_id, position, name, address, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, route_id, position, name, address, latitude, longitude
            "#,
        )
        .bind(route_id.into_inner())
        .bind(position)
        .bind(&point.name)
        .bind(&point.address)
        .bind(point.latitude)
        .bind(point.longitude)
        .fetch_one(&mut *conn)
        .await?;

        saved.push(row.into());
    }

    Ok(saved)
}

impl PgRouteRepository {
    async fn find_one(&self, sql: &str, bind: RouteLookup) -> WaypointResult<Option<Route>> {
        let mut conn = self.pool.inner().acquire().await?;

        let query = sqlx::query_as::<_, RouteRow>(sql);
        let query = match bind {
            RouteLookup::Id(id) => query.bind(id.into_inner()),
            RouteLookup::Chat(chat_id) => query.bind(chat_id.into_inner()),
        };

        let Some(row) = query.fetch_optional(&mut *conn).await? else {
            return Ok(None);
        };

        let points = load_points(&mut conn, RouteId::from_uuid(row.id)).await?;
        row.into_route(points).map(Some)
    }
}

enum RouteLookup {
    Id(RouteId),
    Chat(ChatId),
}

#[async_trait]
impl RouteRepository for PgRouteRepository {
    async fn find_by_id(&self, id: RouteId) -> WaypointResult<Option<Route>> {
        debug!("Finding route by id: {}", id);
        self.find_one(
            "SELECT id, chat_id, route_type, updated_at FROM routes WHERE id = $1",
            RouteLookup::Id(id),
        )
        .await
    }

    async fn find_by_chat(&self, chat_id: ChatId) -> WaypointResult<Option<Route>> {
        debug!("Finding route by chat: {}", chat_id);
        self.find_one(
            "SELECT id, chat_id, route_type, updated_at FROM routes WHERE chat_id = $1",
            RouteLookup::Chat(chat_id),
        )
        .await
    }

    async fn find_refs_by_user(&self, user_id: UserId) -> WaypointResult<Vec<RouteRef>> {
        let rows: Vec<(Uuid, i64)> = sqlx::query_as(
            r#"
            SELECT r.id, r.chat_id
            FROM routes r
            JOIN chats c ON c.id = r.chat_id
            WHERE c.user_id = $1
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, chat_id)| RouteRef {
                id: RouteId::from_uuid(id),
                chat_id: ChatId::new(chat_id),
            })
            .collect())
    }

    async fn save(&self, route: &Route, points: &[NewRoutePoint]) -> WaypointResult<Route> {
        debug!("Saving route {} for chat {}", route.id, route.chat_id);

        let mut tx = self.pool.inner().begin().await?;

        let row = sqlx::query_as::<_, RouteRow>(
            r#"
            INSERT INTO routes (id, chat_id, route_type, updated_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, chat_id, route_type, updated_at
            "#,
        )
        .bind(route.id.into_inner())
        .bind(route.chat_id.into_inner())
        .bind(route.route_type.as_str())
        .bind(route.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        let saved_points = insert_points(&mut tx, route.id, points).await?;
        tx.commit().await?;

        row.into_route(saved_points)
    }

    async fn update(&self, route: &Route, points: Option<&[NewRoutePoint]>) -> WaypointResult<Route> {
        debug!("Updating route: {}", route.id);

        let mut tx = self.pool.inner().begin().await?;

        let row = sqlx::query_as::<_, RouteRow>(
            r#"
            UPDATE routes
            SET route_type = $1, updated_at = $2
            WHERE id = $3
            RETURNING id, chat_id, route_type, updated_at
            "#,
        )
        .bind(route.route_type.as_str())
        .bind(route.updated_at)
        .bind(route.id.into_inner())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| WaypointError::not_found("Route", route.id))?;

        let stored_points = match points {
            Some(points) => {
                let removed = sqlx::query("DELETE FROM route_points WHERE route_id = $1")
                    .bind(route.id.into_inner())
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
                debug!("Replaced {} points on route {}", removed, route.id);
                insert_points(&mut tx, route.id, points).await?
            }
            None => load_points(&mut tx, route.id).await?,
        };

        tx.commit().await?;
        row.into_route(stored_points)
    }

    async fn delete(&self, id: RouteId) -> WaypointResult<bool> {
        debug!("Deleting route: {}", id);

        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for PgRouteRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgRouteRepository").finish_non_exhaustive()
    }
}
