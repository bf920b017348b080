//! SocialHub Server: real-time presence and notification fan-out.
//!
//! Main entry point that wires all crates together and starts the server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use socialhub_core::config::{AppConfig, DatabaseProvider};
use socialhub_core::error::AppError;
use socialhub_database::memory::{MemoryNotificationStore, MemoryProfileDirectory};
use socialhub_database::repositories::{PgNotificationStore, PgProfileDirectory};
use socialhub_database::{DatabasePool, NotificationStore, ProfileDirectory};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and `SOCIALHUB__*` variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("SOCIALHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting SocialHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Notification store ───────────────────────────────
    let (store, profiles, db_pool): (
        Arc<dyn NotificationStore>,
        Arc<dyn ProfileDirectory>,
        Option<DatabasePool>,
    ) = match config.database.provider {
        DatabaseProvider::Postgres => {
            let pool = DatabasePool::connect(&config.database).await?;
            if config.database.run_migrations {
                tracing::info!("Running database migrations...");
                socialhub_database::migration::run_migrations(pool.pool()).await?;
                tracing::info!("Database migrations complete");
            }
            (
                Arc::new(PgNotificationStore::new(pool.pool().clone())),
                Arc::new(PgProfileDirectory::new(pool.pool().clone())),
                Some(pool),
            )
        }
        DatabaseProvider::Memory => {
            tracing::warn!("Using in-memory store; notifications are lost on restart");
            (
                Arc::new(MemoryNotificationStore::new()),
                Arc::new(MemoryProfileDirectory::new()),
                None,
            )
        }
    };

    // ── Step 2: Realtime engine, services, router ────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let mut state = socialhub_api::build_state(config, store, profiles);
    if let Some(pool) = db_pool.clone() {
        state = state.with_database(pool);
    }
    let realtime = state.realtime.clone();
    let app = socialhub_api::build_app(state);

    // ── Step 3: Bind and serve ───────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("SocialHub server listening on {}", addr);

    // ── Step 4: Graceful shutdown ────────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        realtime.shutdown();
        let _ = shutdown_tx.send(true);
    });

    tokio::select! {
        result = server.into_future() => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = async {
            let _ = shutdown_rx.wait_for(|stopping| *stopping).await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_seconds = grace.as_secs(), "Grace period elapsed, dropping open requests");
        }
    }

    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("SocialHub server shut down gracefully");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
