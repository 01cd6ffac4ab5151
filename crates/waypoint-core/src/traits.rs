//! Core traits shared across layers.

use async_trait::async_trait;

/// Trait for infrastructure health checks (database, cache).
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Returns the name of this health check.
    fn name(&self) -> &str;

    /// Performs the health check.
    async fn check(&self) -> HealthStatus;
}

/// Health check status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// The component is healthy.
    Healthy,
    /// The component is switched off by configuration.
    Disabled,
    /// The component is unhealthy.
    Unhealthy(String),
}

impl HealthStatus {
    /// Returns true unless the component reported a failure.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        !matches!(self, Self::Unhealthy(_))
    }

    /// Returns a short label for JSON health reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Healthy => "up",
            Self::Disabled => "disabled",
            Self::Unhealthy(_) => "down",
        }
    }
}
