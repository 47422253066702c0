use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use super::{connect_store, database::seed_defaults};
use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::database::{MemoryStore, Store};

pub async fn handle(in_memory: bool) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    info!("Starting LM Aluguéis API in {:?} mode", config.environment);

    let store: Arc<dyn Store> = if in_memory {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        // Nobody could log in to an empty process-local store
        seed_defaults(store.clone(), config.security.bcrypt_cost).await?;
        info!("Using in-memory store; data is lost on exit");
        store
    } else {
        connect_store(&config).await?
    };

    let bind_addr = config.bind_address();
    let state = AppState::new(config, store);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
