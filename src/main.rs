//! QuickShare Server: short-code file and text sharing.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use quickshare_core::config::AppConfig;
use quickshare_core::error::AppError;
use quickshare_core::traits::SystemClock;
use quickshare_service::ShareService;
use quickshare_storage::LocalStorageProvider;
use quickshare_store::{ShareStore, SnapshotFile};
use quickshare_worker::{
    CronScheduler, JobExecutor, ShareCleanupHandler, SnapshotFlushHandler,
};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from the config directory and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_dir =
        std::env::var("QUICKSHARE_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let env = std::env::var("QUICKSHARE_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_dir, &env)
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
    tracing::info!("Starting QuickShare v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Create data directories ──────────────────────────
    create_data_directories(&config).await?;

    // ── Step 2: Blob storage ─────────────────────────────────────
    let storage = LocalStorageProvider::new(&config.storage.local.root_path).await?;
    tracing::info!(root = %config.storage.local.root_path, "Blob storage ready");

    // ── Step 3: Share store + snapshot restore ───────────────────
    let store = Arc::new(ShareStore::new());
    let snapshot = SnapshotFile::new(&config.store.snapshot_path);
    if config.store.snapshot_enabled {
        let restored = snapshot.restore_into(&store, chrono::Utc::now()).await;
        tracing::info!(
            restored,
            path = %snapshot.path().display(),
            "Share metadata restored"
        );
    }

    // ── Step 4: Services ─────────────────────────────────────────
    let share_service = Arc::new(ShareService::new(
        Arc::clone(&store),
        Arc::new(storage),
        Arc::new(SystemClock),
        config.share.clone(),
        config.worker.orphan_grace(),
    ));

    // ── Step 5: Background jobs ──────────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let mut executor = JobExecutor::new();
        executor.register(Arc::new(ShareCleanupHandler::new(Arc::clone(
            &share_service,
        ))));
        if config.store.snapshot_enabled {
            executor.register(Arc::new(SnapshotFlushHandler::new(
                Arc::clone(&store),
                snapshot.clone(),
            )));
        }

        let scheduler = CronScheduler::new(Arc::new(executor)).await?;
        scheduler.register_default_tasks(&config.worker).await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 6: Build and start HTTP server ──────────────────────
    let app_state = quickshare_api::AppState::new(Arc::new(config.clone()), share_service);
    let app = quickshare_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("QuickShare server listening on {}", addr);

    // ── Step 7: Graceful shutdown ────────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });
    let mut server_task = tokio::spawn(async move { server.await });

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let served = tokio::select! {
        joined = &mut server_task => joined,
        _ = shutdown_rx.changed() => {
            match tokio::time::timeout(grace, &mut server_task).await {
                Ok(joined) => joined,
                Err(_) => {
                    tracing::warn!(
                        grace_seconds = grace.as_secs(),
                        "Open connections outlived the shutdown grace period"
                    );
                    server_task.abort();
                    Ok(Ok(()))
                }
            }
        }
    };
    served
        .map_err(|e| AppError::internal(format!("Server task failed: {}", e)))?
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 8: Stop jobs and flush metadata ─────────────────────
    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!("Scheduler shutdown failed: {}", e);
        }
    }

    if config.store.snapshot_enabled {
        match snapshot.flush(&store).await {
            Ok(Some(count)) => tracing::info!(count, "Final share snapshot written"),
            Ok(None) => tracing::debug!("Share snapshot already up to date"),
            Err(e) => tracing::error!("Final snapshot flush failed: {}", e),
        }
    }

    tracing::info!("QuickShare server shut down gracefully");
    Ok(())
}

/// Create required data directories
async fn create_data_directories(config: &AppConfig) -> Result<(), AppError> {
    let mut dirs = vec![
        std::path::PathBuf::from(&config.storage.data_root),
        std::path::PathBuf::from(&config.storage.local.root_path),
    ];
    if let Some(parent) = std::path::Path::new(&config.store.snapshot_path).parent() {
        dirs.push(parent.to_path_buf());
    }

    for dir in dirs.iter().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            AppError::internal(format!("Failed to create dir '{}': {}", dir.display(), e))
        })?;
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
