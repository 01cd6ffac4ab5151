//! Dependency injection module using Shaku.

use shaku::HasComponent;
use std::sync::Arc;
use waypoint_config::AppConfig;
use waypoint_core::{module, HealthCheck, WaypointResult};
use waypoint_repository::{
    DatabaseHealthCheck, DatabasePool, DatabasePoolInterface, DatabasePoolParameters, PgChatRepository,
    PgMessageRepository, PgRouteRepository, PgUserRepository,
};
use waypoint_security::{PasswordHasher, PasswordHasherParameters};
use waypoint_service::{
    CacheHealthCheck, CacheInterface, ChatServiceComponent, MessageServiceComponent, RedisCacheService,
    RouteServiceComponent, UserServiceComponent, UserServiceComponentParameters,
};

// Single-process deployment: PostgreSQL repositories, Redis cache and the
// four business services.
module! {
    pub WaypointModule {
        components = [
            DatabasePool,
            PasswordHasher,
            RedisCacheService,
            PgUserRepository,
            PgChatRepository,
            PgMessageRepository,
            PgRouteRepository,
            UserServiceComponent,
            ChatServiceComponent,
            MessageServiceComponent,
            RouteServiceComponent,
        ],
        providers = [],
    }
}

/// Builds the module around an already created database pool.
pub fn build_module(db_pool: DatabasePool, config: &AppConfig) -> WaypointResult<Arc<WaypointModule>> {
    let cache = RedisCacheService::from_config(&config.redis)?;
    let password_hasher = PasswordHasher::from_config(&config.security);

    let module = WaypointModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.into_inner(),
        })
        .with_component_parameters::<RedisCacheService>(cache.into_parameters())
        .with_component_parameters::<PasswordHasher>(PasswordHasherParameters {
            argon2: password_hasher.argon2_arc(),
        })
        .with_component_parameters::<UserServiceComponent>(UserServiceComponentParameters {
            min_password_length: config.security.min_password_length,
        })
        .build();

    Ok(Arc::new(module))
}

/// Dependencies checked by the readiness endpoint.
pub fn health_checks(module: &WaypointModule) -> Vec<Arc<dyn HealthCheck>> {
    let pool: Arc<dyn DatabasePoolInterface> = module.resolve();
    let cache: Arc<dyn CacheInterface> = module.resolve();

    vec![
        Arc::new(DatabaseHealthCheck::new(pool)),
        Arc::new(CacheHealthCheck::new(cache)),
    ]
}
