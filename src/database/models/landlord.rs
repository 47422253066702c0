use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Owner record attached to every property.
///
/// Rows provisioned for an admin copy the admin's name, e-mail and password
/// hash at creation time and are not kept in sync afterwards.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Landlord {
    pub id: i32,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "cidade")]
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLandlord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub city: Option<String>,
}
