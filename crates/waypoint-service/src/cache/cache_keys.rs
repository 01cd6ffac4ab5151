//! Cache key generators for consistent key naming.

use waypoint_core::{ChatId, RouteId, UserId};

/// Prefix for all cache keys to namespace them.
const CACHE_PREFIX: &str = "waypoint:cache";

/// Generate a cache key for a user by ID.
#[must_use]
pub fn user_by_id(id: UserId) -> String {
    format!("{}:user:id:{}", CACHE_PREFIX, id)
}

/// Generate a cache key for a route by ID.
#[must_use]
pub fn route_by_id(id: RouteId) -> String {
    format!("{}:route:id:{}", CACHE_PREFIX, id)
}

/// Generate a cache key for the route attached to a chat.
#[must_use]
pub fn route_by_chat(chat_id: ChatId) -> String {
    format!("{}:route:chat:{}", CACHE_PREFIX, chat_id)
}

/// Both keys under which a route is cached.
#[must_use]
pub fn route_keys(id: RouteId, chat_id: ChatId) -> Vec<String> {
    vec![route_by_id(id), route_by_chat(chat_id)]
}
