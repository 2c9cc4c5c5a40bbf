//! Wrapups service
//!
//! Serves wrap-up notes to callers holding a valid bearer token.

use common::observability::{init_tracing, LogFormat};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use wrapups_service::config::Config;
use wrapups_service::observability::init_metrics_recorder;
use wrapups_service::repositories::InMemoryWrapupStore;
use wrapups_service::routes::{self, AppState};

const DEFAULT_LOG_DIRECTIVES: &str = "wrapups_service=debug,common=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = init_tracing(DEFAULT_LOG_DIRECTIVES, LogFormat::Text);
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    init_tracing(DEFAULT_LOG_DIRECTIVES, config.log_format)?;

    info!("Starting Wrapups service");
    info!(
        bind_address = %config.bind_address,
        auth_mode = ?config.auth_mode,
        expected_audience = %config.expected_audience,
        validation_timeout_ms = config.validation_timeout.as_millis() as u64,
        "Configuration loaded successfully"
    );

    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics recorder: {}", e);
        e
    })?;

    let validator = config.build_validator().map_err(|e| {
        error!("Failed to build token validator: {}", e);
        e
    })?;
    info!(
        strategy = validator.strategy(),
        audience_checked = validator.checks_audience(),
        "Token validator ready"
    );
    if !validator.checks_audience() {
        warn!(
            strategy = validator.strategy(),
            expected_audience = %config.expected_audience,
            "Token audience is not checked; tokens issued for any audience will be accepted"
        );
    }

    let state = Arc::new(AppState {
        store: Arc::new(InMemoryWrapupStore::new()),
        validator,
    });

    let app = routes::build_routes(state, metrics_handle);

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Wrapups service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Wrapups service shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
