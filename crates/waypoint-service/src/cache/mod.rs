//! Caching infrastructure for the service layer.
//!
//! A cache abstraction with a Redis implementation. Users are cached by id,
//! routes by id and by owning chat.

mod cache_interface;
pub mod cache_keys;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheInterface};
#[cfg(test)]
pub use cache_interface::MockCacheInterface;
pub use redis_cache::{CacheHealthCheck, RedisCacheService, RedisCacheServiceParameters, DEFAULT_TTL};
