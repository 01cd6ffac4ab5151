//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shaku::Interface;
use std::time::Duration;
use tracing::warn;
use waypoint_core::WaypointResult;

/// Cache interface for storing and retrieving cached data.
///
/// Values travel as JSON strings so the trait stays dyn-compatible; typed
/// access lives in [`CacheExt`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> WaypointResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> WaypointResult<()>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> WaypointResult<bool>;

    /// Round-trips to the backend. A disabled cache always succeeds.
    async fn ping(&self) -> WaypointResult<()>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;

    /// TTL applied by [`CacheExt::store`].
    fn default_ttl(&self) -> Duration;
}

/// Typed helpers over [`CacheInterface`].
///
/// `get`/`set` propagate failures. The `lookup`/`store`/`evict` variants
/// log and swallow them: a broken cache degrades to a miss, never to a
/// failed request.
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> WaypointResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T, ttl: Duration) -> WaypointResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }

    /// Reads a typed value, treating any cache failure as a miss.
    async fn lookup<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        match self.get::<T>(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Cache read failed for '{}': {}", key, e);
                None
            }
        }
    }

    /// Writes a typed value under the default TTL, logging failures.
    async fn store<T: Serialize + Send + Sync>(&self, key: &str, value: &T) {
        if let Err(e) = self.set(key, value, self.default_ttl()).await {
            warn!("Cache write failed for '{}': {}", key, e);
        }
    }

    /// Removes keys, logging failures.
    async fn evict(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.delete(key).await {
                warn!("Cache eviction failed for '{}': {}", key, e);
            }
        }
    }
}

impl<T: CacheInterface + ?Sized> CacheExt for T {}
