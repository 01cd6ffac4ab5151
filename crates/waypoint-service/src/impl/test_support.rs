//! Fixtures shared by the service tests.

use crate::cache::{CacheInterface, RedisCacheService};
use std::sync::Arc;
use waypoint_config::SecurityConfig;
use waypoint_core::{Chat, Email, NewChat, NewUser, User, UserId};
use waypoint_repository::{ChatRepository, MemoryStore, UserRepository};
use waypoint_security::{PasswordHasher, PasswordHasherInterface};

pub(crate) fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// Argon2 with the cheapest accepted parameters.
pub(crate) fn fast_hasher() -> Arc<dyn PasswordHasherInterface> {
    Arc::new(PasswordHasher::from_config(&SecurityConfig {
        argon2_memory_kib: 64,
        argon2_iterations: 1,
        argon2_parallelism: 1,
        ..SecurityConfig::default()
    }))
}

pub(crate) fn disabled_cache() -> Arc<dyn CacheInterface> {
    Arc::new(RedisCacheService::disabled())
}

pub(crate) async fn seed_user(store: &MemoryStore, login: &str) -> User {
    let email = Email::new(format!("{login}@example.com")).unwrap();
    UserRepository::save(store, &NewUser::new(login, email, "$argon2id$placeholder"))
        .await
        .unwrap()
}

pub(crate) async fn seed_chat(store: &MemoryStore, user_id: UserId, title: &str) -> Chat {
    ChatRepository::save(store, &NewChat::new(title, user_id)).await.unwrap()
}
