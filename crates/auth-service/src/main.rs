//! Wrapups issuer
//!
//! Verifies credentials and issues signed access tokens.

use auth_service::config::Config;
use auth_service::credentials::FileCredentialStore;
use auth_service::crypto;
use auth_service::handlers::AppState;
use auth_service::observability::init_metrics_recorder;
use auth_service::routes;
use auth_service::services::TokenIssuer;
use common::jwt::ClaimExpectations;
use common::observability::{init_tracing, LogFormat};
use common::validator::LocalValidator;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

const DEFAULT_LOG_DIRECTIVES: &str = "auth_service=debug,common=debug,tower_http=debug";

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

    info!("Starting Wrapups issuer");
    info!(
        bind_address = %config.bind_address,
        issuer = %config.issuer,
        "Configuration loaded successfully"
    );

    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics recorder: {}", e);
        e
    })?;

    // Key problems are fatal here so they never surface per request
    let signing_key =
        crypto::initialize_signing_key(&config.signing_key_path, config.generate_signing_key)
            .map_err(|e| {
                error!("Failed to load signing key: {}", e);
                e
            })?;
    let verifying_key = signing_key.verifying_key()?;

    let credentials = FileCredentialStore::open(config.credentials_path.clone())
        .await
        .map_err(|e| {
            error!("Failed to open credential store: {}", e);
            e
        })?;

    let issuer = TokenIssuer::new(
        Arc::new(credentials),
        Arc::new(signing_key),
        config.issuer.clone(),
    );
    let validator = LocalValidator::new(
        Arc::new(verifying_key),
        ClaimExpectations {
            issuer: Some(config.issuer.clone()),
            audience: None,
        },
    );

    let state = Arc::new(AppState {
        issuer: Arc::new(issuer),
        validator: Arc::new(validator),
    });

    let app = routes::build_routes(state, metrics_handle);

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Wrapups issuer listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Wrapups issuer shutdown complete");

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
