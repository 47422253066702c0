use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::customer::CustomerAccount;
use super::property::Property;

/// A customer's offer on a listing, optionally answered by the landlord.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: i32,
    #[serde(rename = "clienteId")]
    pub customer_id: Uuid,
    #[serde(rename = "imovelId")]
    pub property_id: i32,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "resposta")]
    pub reply: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[sqlx(skip)]
    #[serde(rename = "cliente", skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerAccount>,

    #[sqlx(skip)]
    #[serde(rename = "imovel", skip_serializing_if = "Option::is_none")]
    pub property: Option<Property>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProposal {
    pub customer_id: Uuid,
    pub property_id: i32,
    pub description: String,
}
