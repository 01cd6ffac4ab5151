//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use waypoint_core::WaypointError;

/// Prefix for environment variable overrides, e.g. `WAYPOINT__REDIS__HOST`.
pub const ENV_PREFIX: &str = "WAYPOINT";

/// Configuration loader with layered sources.
///
/// Loading runs before logging is initialised, so the loader records what
/// it read and [`ConfigLoader::log_summary`] reports it afterwards.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
    environment: String,
    sources: Vec<PathBuf>,
    dotenv: Option<PathBuf>,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Uncommitted local overrides
    /// 4. Environment variables with `WAYPOINT__` prefix
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self, WaypointError> {
        let config_dir = config_dir.into();
        let dotenv = dotenvy::dotenv().ok();

        let environment =
            std::env::var(format!("{ENV_PREFIX}_ENVIRONMENT")).unwrap_or_else(|_| "development".to_string());

        let sources = Self::source_files(&config_dir, &environment);
        let config = Self::load_config(&sources)?;

        Ok(Self {
            config,
            environment,
            sources,
            dotenv,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, WaypointError> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Logs which sources were used. Call once a subscriber is installed.
    pub fn log_summary(&self) {
        info!("Loading configuration for environment: {}", self.environment);

        if let Some(path) = &self.dotenv {
            info!("Loaded environment from: {}", path.display());
        }

        for path in &self.sources {
            info!("Loaded config from: {}", path.display());
        }

        if !self.config.redis.enabled {
            warn!("Redis cache is disabled; all reads go to the database");
        }
    }

    fn source_files(config_dir: &Path, environment: &str) -> Vec<PathBuf> {
        ["default", environment, "local"]
            .iter()
            .map(|name| config_dir.join(format!("{name}.toml")))
            .filter(|path| path.exists())
            .collect()
    }

    fn load_config(sources: &[PathBuf]) -> Result<AppConfig, WaypointError> {
        let mut builder = Config::builder();

        for path in sources {
            builder = builder.add_source(File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_waypoint_error)?;

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    fn validate_config(config: &AppConfig) -> Result<(), WaypointError> {
        if config.database.url.trim().is_empty() {
            return Err(WaypointError::Configuration("Database URL is required".to_string()));
        }

        if !config.database.url.starts_with("postgres://") && !config.database.url.starts_with("postgresql://") {
            return Err(WaypointError::Configuration(
                "Database URL must use the postgres:// scheme".to_string(),
            ));
        }

        if config.redis.enabled && config.redis.host.trim().is_empty() {
            return Err(WaypointError::Configuration(
                "Redis host is required when the cache is enabled".to_string(),
            ));
        }

        if config.database.min_connections > config.database.max_connections {
            return Err(WaypointError::Configuration(
                "database.min_connections exceeds database.max_connections".to_string(),
            ));
        }

        if config.redis.enabled {
            config.redis.url()?;
        }

        Ok(())
    }
}

fn config_error_to_waypoint_error(err: ConfigError) -> WaypointError {
    WaypointError::Configuration(err.to_string())
}
