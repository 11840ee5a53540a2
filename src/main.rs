//! Shiftwise server — shift-scheduling backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use shiftwise_api::{AppState, build_router};
use shiftwise_core::config::AppConfig;
use shiftwise_core::error::AppError;
use shiftwise_database::repositories::store::PgStoreRepository;
use shiftwise_database::repositories::task::PgTaskLedger;
use shiftwise_database::{DatabasePool, StoreRepository, TaskLedger};
use shiftwise_service::{StoreService, TaskService};
use shiftwise_worker::{CleanupScheduler, TaskRunner, WorkerPool};

#[tokio::main]
async fn main() {
    let env = std::env::var("SHIFTWISE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
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
    tracing::info!("Starting Shiftwise v{}", env!("CARGO_PKG_VERSION"));

    // ── Database connection + migrations ─────────────────────────
    let db = DatabasePool::connect(&config.database).await?;
    shiftwise_database::migration::run_migrations(db.pool()).await?;

    // ── Repositories & services ──────────────────────────────────
    let ledger: Arc<dyn TaskLedger> = Arc::new(PgTaskLedger::new(db.pool().clone()));
    let store_repo: Arc<dyn StoreRepository> = Arc::new(PgStoreRepository::new(db.pool().clone()));
    let tasks = Arc::new(TaskService::new(Arc::clone(&ledger), &config.task));
    let stores = Arc::new(StoreService::new(store_repo));

    // ── Worker pools (constructed once, owned here) ──────────────
    let grace = Duration::from_secs(config.worker.shutdown_grace_seconds);
    let general_pool = Arc::new(WorkerPool::new("general", &config.worker.general, grace));
    let database_pool = Arc::new(WorkerPool::new("database", &config.worker.database, grace));
    let runner = Arc::new(TaskRunner::new(
        Arc::clone(&tasks),
        Arc::clone(&database_pool),
    ));

    // ── Cleanup scheduler ────────────────────────────────────────
    let mut sweeper =
        CleanupScheduler::new(Arc::clone(&ledger), config.task.sweep_schedule.clone()).await?;
    sweeper.register().await?;
    sweeper.start().await?;

    // ── HTTP server ──────────────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        config: Arc::new(config),
        tasks,
        stores,
        runner,
    };
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!(%addr, "Shiftwise listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Graceful teardown: stop the sweep, drain both pools ──────
    if let Err(e) = sweeper.shutdown().await {
        tracing::warn!("Scheduler shutdown failed: {e}");
    }
    general_pool.shutdown().await;
    database_pool.shutdown().await;
    db.close().await;

    tracing::info!("Shiftwise shut down");
    Ok(())
}

/// Resolve on SIGINT/SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::warn!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
