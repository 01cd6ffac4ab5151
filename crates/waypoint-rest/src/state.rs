//! Application state for Axum handlers.

use shaku::{HasComponent, Module};
use std::sync::Arc;
use waypoint_core::HealthCheck;
use waypoint_service::{ChatService, MessageService, RouteService, UserService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub chat_service: Arc<dyn ChatService>,
    pub message_service: Arc<dyn MessageService>,
    pub route_service: Arc<dyn RouteService>,
    /// Dependencies checked by `/ready`.
    pub health_checks: Arc<Vec<Arc<dyn HealthCheck>>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        user_service: Arc<dyn UserService>,
        chat_service: Arc<dyn ChatService>,
        message_service: Arc<dyn MessageService>,
        route_service: Arc<dyn RouteService>,
    ) -> Self {
        Self {
            user_service,
            chat_service,
            message_service,
            route_service,
            health_checks: Arc::new(Vec::new()),
        }
    }

    /// Resolves every service from a Shaku module.
    pub fn from_module<M>(module: &M) -> Self
    where
        M: Module
            + HasComponent<dyn UserService>
            + HasComponent<dyn ChatService>
            + HasComponent<dyn MessageService>
            + HasComponent<dyn RouteService>,
    {
        Self::new(module.resolve(), module.resolve(), module.resolve(), module.resolve())
    }

    /// Sets the dependencies checked by the readiness endpoint.
    #[must_use]
    pub fn with_health_checks(mut self, checks: Vec<Arc<dyn HealthCheck>>) -> Self {
        self.health_checks = Arc::new(checks);
        self
    }
}
