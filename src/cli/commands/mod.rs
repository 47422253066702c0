pub mod admin;
pub mod database;
pub mod serve;

use std::sync::Arc;

use anyhow::Context;

use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgStore, Store};

/// Open the Postgres store described by `config`, migrating first when enabled.
pub(crate) async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the database")?;

    if config.database.run_migrations {
        DatabaseManager::migrate(&pool).await.context("failed to apply migrations")?;
    }

    Ok(Arc::new(PgStore::new(pool)))
}
