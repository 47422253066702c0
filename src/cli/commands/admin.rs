use anyhow::Context;
use serde_json::json;

use super::connect_store;
use crate::api::parse_new_admin;
use crate::config::AppConfig;
use crate::services::AdminService;

/// Same validation and password policy as `POST /admins`.
pub async fn create(name: String, email: String, password: String, level: i64) -> anyhow::Result<()> {
    let input = parse_new_admin(&json!({
        "nome": name,
        "email": email,
        "senha": password,
        "nivel": level,
    }))
    .map_err(|violations| {
        let details: Vec<String> = violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect();
        anyhow::anyhow!("invalid admin: {}", details.join(", "))
    })?;

    let config = AppConfig::from_env().context("invalid configuration")?;
    let store = connect_store(&config).await?;
    let admin = AdminService::new(store, config.security.bcrypt_cost)
        .create(input)
        .await?;

    println!("Admin created: {} <{}> level {}", admin.id, admin.email, admin.level);
    Ok(())
}
