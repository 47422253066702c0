use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use super::connect_store;
use crate::api::AdminInput;
use crate::config::AppConfig;
use crate::database::models::NewLandlord;
use crate::database::{DatabaseManager, Store};
use crate::services::AdminService;

pub const DEFAULT_ADMIN_NAME: &str = "Administrador do Sistema";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@alugaaqui.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "Admin@123";
const DEFAULT_LANDLORD_PHONE: &str = "(53) 99999-9999";
const DEFAULT_LANDLORD_CITY: &str = "Pelotas";

pub async fn migrate() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the database")?;

    DatabaseManager::migrate(&pool).await.context("failed to apply migrations")?;
    println!("Migrations applied");
    Ok(())
}

pub async fn seed() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    let store = connect_store(&config).await?;

    seed_defaults(store, config.security.bcrypt_cost).await?;
    println!("Default admin: {} / {}", DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD);
    Ok(())
}

/// Create the default admin and its landlord record. Existing rows are left alone.
pub async fn seed_defaults(store: Arc<dyn Store>, bcrypt_cost: u32) -> anyhow::Result<()> {
    let admin = match store.find_admin_by_email(DEFAULT_ADMIN_EMAIL).await? {
        Some(admin) => {
            info!("Default admin already present");
            admin
        }
        None => {
            let admins = AdminService::new(store.clone(), bcrypt_cost);
            admins
                .create(AdminInput {
                    name: DEFAULT_ADMIN_NAME.to_string(),
                    email: DEFAULT_ADMIN_EMAIL.to_string(),
                    password: DEFAULT_ADMIN_PASSWORD.to_string(),
                    level: 1,
                })
                .await
                .context("failed to create default admin")?
        }
    };

    let landlord = store
        .ensure_landlord(NewLandlord {
            name: admin.name,
            email: admin.email,
            password_hash: admin.password_hash,
            phone: Some(DEFAULT_LANDLORD_PHONE.to_string()),
            city: Some(DEFAULT_LANDLORD_CITY.to_string()),
        })
        .await?;

    info!("Seeded admin {} with landlord {}", admin.id, landlord.id);
    Ok(())
}
