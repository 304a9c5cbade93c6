use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use service::auth::service::AuthConfig;
use service::runtime;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

/// Bootstrap storage and build the application router.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let store = runtime::bootstrap(&cfg.storage)
        .await
        .map_err(|e| StartupError::Bootstrap(format!("{e:#}")))?;
    if cfg.auth.uses_dev_secret() {
        warn!("JWT_SECRET not set; using the development secret");
    }
    let state = ServerState::new(store, AuthConfig::from_settings(&cfg.auth));
    Ok(routes::build_router(state, &cfg.storage.uploads_dir, routes::build_cors()))
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr: SocketAddr = cfg
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}: {e}", cfg.bind_addr())))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.to_string(), source })?;
    info!(%addr, data_dir = %cfg.storage.data_dir.display(), "server is running, using file-based storage");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}
