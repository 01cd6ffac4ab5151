//! PostgreSQL repository implementations.

mod chat_repository;
mod message_repository;
mod route_repository;
mod user_repository;

pub use chat_repository::PgChatRepository;
pub use message_repository::PgMessageRepository;
pub use route_repository::PgRouteRepository;
pub use user_repository::PgUserRepository;

use waypoint_core::{PageRequest, WaypointError};

/// Converts a `COUNT(*)` result into a page total.
pub(crate) fn total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// Maps an enum column that failed to parse.
pub(crate) fn corrupt_column(column: &str, err: impl std::fmt::Display) -> WaypointError {
    WaypointError::Internal(format!("Invalid {} in database: {}", column, err))
}

pub(crate) fn log_page(entity: &str, page: PageRequest) {
    tracing::debug!("Listing {}, page: {}, size: {}", entity, page.page, page.size);
}
