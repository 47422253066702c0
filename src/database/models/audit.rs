use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: i32,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "complemento")]
    pub detail: String,
    /// Effective id of the acting principal; not constrained to the admins table.
    pub admin_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub description: String,
    pub detail: String,
    pub admin_id: Uuid,
}

impl NewAuditEntry {
    pub fn failed_login(admin_id: Uuid, admin_name: &str) -> Self {
        Self {
            description: "Tentativa de acesso ao sistema".to_string(),
            detail: format!("Admin: {} - {}", admin_id, admin_name),
            admin_id,
        }
    }

    pub fn property_removed(title: &str, actor_id: Uuid, actor_name: &str) -> Self {
        Self {
            description: format!("Exclusão de: {}", title),
            detail: format!("Admin: {}", actor_name),
            admin_id: actor_id,
        }
    }
}
