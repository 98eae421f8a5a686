pub mod api;
pub mod config;
pub mod model;
pub mod store;

use anyhow::Context;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

// Export API types
pub use api::routes::{build_app, create_router};
pub use api::AppError;

pub use config::{AppConfig, Mode};

// Export all model types
pub use model::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, Store, StoreError};

/// Initialize logging, defaulting to INFO and keeping sqlx quiet unless RUST_LOG says otherwise
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,sqlx=warn"),
    )
    .try_init();
}

/// Connect the configured store and serve until a shutdown signal arrives
pub async fn start(config: AppConfig) -> anyhow::Result<()> {
    let database_url = config.database_url();

    if store::is_memory_url(&database_url) {
        log::warn!("No database configured, records are kept in memory only");
        return serve_on_config(Arc::new(MemoryStore::new()), &config).await;
    }

    log::info!("Connecting to PostgreSQL...");
    let postgres_store = PostgresStore::new(&database_url, config.max_connections()).await?;

    log::info!("Running database migrations...");
    postgres_store.migrate().await?;

    serve_on_config(Arc::new(postgres_store), &config).await
}

async fn serve_on_config<S: Store + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    log::info!("Server is listening on http://{}", listener.local_addr()?);

    serve(listener, store, config.mode, shutdown_signal()).await
}

/// Serve the application on an already bound listener.
///
/// The store is closed once `shutdown` resolves and in-flight requests have finished.
pub async fn serve<S, F>(
    listener: TcpListener,
    store: Arc<S>,
    mode: Mode,
    shutdown: F,
) -> anyhow::Result<()>
where
    S: Store + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(store.clone(), mode);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    store.close().await;
    log::info!("Store connection closed");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
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
                log::error!("Failed to listen for SIGTERM: {}", e);
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

    log::info!("Shutdown signal received, draining connections");
}
