//! Kanban Auth API
//!
//! User and token endpoints for the kanban backend.
//!
//! ## REST Endpoints
//!
//! - `POST /api/users/register` - Create a user, returns a token pair
//! - `POST /api/users/login` - Check credentials, returns a token pair
//! - `GET /api/users/me` - Profile of the authorized user
//! - `GET /api/users/all` - Profiles of every user
//! - `POST /api/users/change-password` - Replace the password
//! - `POST /api/users/refresh-token` - Exchange a refresh token for a new pair
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /ready` - Readiness check

mod app;
mod config;
mod error;
mod extractors;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use kanban_auth_core::{AuthService, KeyPair};
use kanban_db::{CredentialRepository, MemoryCredentialRepository, PgCredentialRepository};
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("auth_api=debug,kanban_auth_core=info"))?;
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting Kanban Auth API");
    tracing::info!(
        http_host = %config.http_host,
        http_port = config.http_port,
        storage = if config.database_url.is_some() { "postgres" } else { "memory" },
        "Configuration loaded"
    );

    // Keys are required; a bad key pair stops startup here
    let keys = Arc::new(KeyPair::load(
        &config.auth.private_key_path,
        &config.auth.public_key_path,
    )?);

    // Credential storage
    let (repo, pool) = match &config.database_url {
        Some(url) => {
            let pool = kanban_db::create_pool(url).await?;
            kanban_db::run_migrations(&pool).await?;
            tracing::info!("Database pool created and migrations applied");
            let repo: Arc<dyn CredentialRepository> =
                Arc::new(PgCredentialRepository::new(pool.clone()));
            (repo, Some(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory credential storage");
            let repo: Arc<dyn CredentialRepository> = Arc::new(MemoryCredentialRepository::new());
            (repo, None)
        }
    };

    let auth = AuthService::with_keys(config.auth.clone(), keys, repo)?;
    let addr = SocketAddr::new(config.http_host, config.http_port);
    let state = AppState::new(auth, pool, config);

    let router = app::build_router(state);

    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
