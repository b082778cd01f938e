//! jewelry-tryon-api server entry point.
//!
//! Loads configuration, connects the store, and serves the REST API
//! until SIGINT or SIGTERM.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use jewelry_tryon_api::api;
use jewelry_tryon_api::app_state::AppState;
use jewelry_tryon_api::config::{AppConfig, LogFormat, StoreBackend};
use jewelry_tryon_api::persistence::{MemoryStore, PostgresStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env()?;
    init_tracing(&config);
    tracing::info!(
        app = %config.app_name,
        environment = %config.environment,
        addr = %config.listen_addr,
        "starting jewelry-tryon-api"
    );

    // Connect the store
    let store = connect_store(&config).await?;

    // Build application
    let listen_addr = config.listen_addr;
    let app = api::build_app(AppState::new(store, config));

    // Start server
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(addr = %listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let default_level = if config.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::Postgres => Arc::new(PostgresStore::connect(config).await?),
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    store.ping().await?;
    store.ensure_schema().await?;
    tracing::info!(backend = ?config.store_backend, "store ready");
    Ok(store)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
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
    tracing::info!("shutdown signal received");
}
