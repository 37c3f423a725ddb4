pub mod api;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod logging;
pub mod validation;

use std::sync::Arc;

use tokio::sync::watch;

use config::{AppConfig, StorageBackend};
use db::store::{MemoryTriggerStore, SqliteTriggerStore, TriggerStore};
use error::AppError;

/// Open the configured storage backend and seed it when asked to.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn TriggerStore>, AppError> {
    let store: Arc<dyn TriggerStore> = match config.storage {
        StorageBackend::Sqlite => {
            let pool = db::init_db(&config.data_dir)?;
            tracing::info!("Database pool ready (max_size=8)");
            Arc::new(SqliteTriggerStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; triggers are lost on exit");
            Arc::new(MemoryTriggerStore::new())
        }
    };

    if config.seed_demo {
        engine::seed::seed_demo_triggers(store.as_ref()).await?;
    }

    Ok(store)
}

/// Resolve when the process receives Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
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

/// Run the service until a shutdown signal arrives.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting autoreply-server v{}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&config).await?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    api::start_server(api::ApiState::new(store), config.bind_addr, shutdown_rx)
        .await
        .map_err(|e| AppError::Internal(format!("HTTP server failed: {e}")))
}
