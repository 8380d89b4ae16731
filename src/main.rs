use rustpress_token_auth::{create_routes, AuthConfig, AuthError, AuthService, JsonFileStore};

use std::process::ExitCode;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Startup failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AuthError> {
    let config = AuthConfig::from_env()?;
    config.validate()?;
    tracing::debug!(?config, "Configuration loaded");

    let bind_addr = config.bind_addr.clone();
    let store = Arc::new(JsonFileStore::open(&config.user_db_file).await?);
    let auth_service = Arc::new(AuthService::new(&config, store)?);

    let app = create_routes(auth_service).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AuthError::Config(format!("cannot bind {bind_addr}: {e}")))?;
    tracing::info!(addr = %bind_addr, "Authentication service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            tracing::error!("HTTP server error: {:?}", e);
            AuthError::Internal
        })?;

    tracing::info!("Authentication service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
