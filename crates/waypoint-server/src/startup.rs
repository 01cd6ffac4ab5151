//! Server startup.

use crate::di::{build_module, health_checks};
use shaku::HasComponent;
use std::future::Future;
use std::sync::Arc;
use tracing::info;
use waypoint_config::{AppConfig, ServerConfig};
use waypoint_core::{WaypointError, WaypointResult};
use waypoint_repository::{DatabasePool, DatabasePoolInterface};
use waypoint_rest::{create_router, AppState};

/// Connects the backends, wires the services and serves HTTP until
/// `shutdown` resolves.
pub async fn serve(config: AppConfig, shutdown: impl Future<Output = ()> + Send + 'static) -> WaypointResult<()> {
    let db_pool = DatabasePool::new(&config.database).await?;

    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }

    let module = build_module(db_pool, &config)?;
    let state = AppState::from_module(&*module).with_health_checks(health_checks(&module));
    let router = create_router(state, &config.server);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| WaypointError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    print_startup_info(&config.server);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| WaypointError::Internal(format!("HTTP server error: {}", e)))?;

    let pool: Arc<dyn DatabasePoolInterface> = module.resolve();
    pool.close().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Prints server startup information.
pub fn print_startup_info(server: &ServerConfig) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:  http://{}/api/v1", server.addr());
    info!("Health:    http://{}/health", server.addr());
    info!("API Docs:  http://{}/swagger-ui", server.addr());
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_startup_info(&ServerConfig::default());
    }
}
