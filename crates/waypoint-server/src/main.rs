//! # Waypoint Server
//!
//! Main entry point for the Waypoint backend.

use tokio::signal;
use tracing::{error, info};
use waypoint_config::{ConfigLoader, ObservabilityConfig};
use waypoint_core::WaypointResult;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {}", e);
        eprintln!("waypoint-server: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> WaypointResult<()> {
    let loader = ConfigLoader::from_default_location()?;

    init_logging(&loader.config().observability);

    info!("Starting Waypoint server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    loader.log_summary();

    let config = loader.into_config();

    waypoint_server::startup::serve(config, shutdown_signal()).await
}

fn init_logging(config: &ObservabilityConfig) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=debug,sqlx=warn", config.log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_json() {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
