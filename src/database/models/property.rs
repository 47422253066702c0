use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::landlord::Landlord;

/// Closed set of listing categories. Wire and database spellings match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "property_type")]
pub enum PropertyType {
    #[serde(rename = "CASA")]
    #[sqlx(rename = "CASA")]
    House,
    #[serde(rename = "APARTAMENTO")]
    #[sqlx(rename = "APARTAMENTO")]
    Apartment,
    #[serde(rename = "KITNET")]
    #[sqlx(rename = "KITNET")]
    Kitnet,
    #[serde(rename = "STUDIO")]
    #[sqlx(rename = "STUDIO")]
    Studio,
    #[serde(rename = "COBERTURA")]
    #[sqlx(rename = "COBERTURA")]
    Penthouse,
    #[serde(rename = "SOBRADO")]
    #[sqlx(rename = "SOBRADO")]
    Townhouse,
    #[serde(rename = "COMERCIAL")]
    #[sqlx(rename = "COMERCIAL")]
    Commercial,
    #[serde(rename = "SALA_COMERCIAL")]
    #[sqlx(rename = "SALA_COMERCIAL")]
    Office,
    #[serde(rename = "LOJA")]
    #[sqlx(rename = "LOJA")]
    Store,
    #[serde(rename = "GALPAO")]
    #[sqlx(rename = "GALPAO")]
    Warehouse,
    #[serde(rename = "TERRENO")]
    #[sqlx(rename = "TERRENO")]
    Lot,
    #[serde(rename = "CHACARA")]
    #[sqlx(rename = "CHACARA")]
    SmallFarm,
}

impl PropertyType {
    pub const ALL: [PropertyType; 12] = [
        PropertyType::House,
        PropertyType::Apartment,
        PropertyType::Kitnet,
        PropertyType::Studio,
        PropertyType::Penthouse,
        PropertyType::Townhouse,
        PropertyType::Commercial,
        PropertyType::Office,
        PropertyType::Store,
        PropertyType::Warehouse,
        PropertyType::Lot,
        PropertyType::SmallFarm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "CASA",
            PropertyType::Apartment => "APARTAMENTO",
            PropertyType::Kitnet => "KITNET",
            PropertyType::Studio => "STUDIO",
            PropertyType::Penthouse => "COBERTURA",
            PropertyType::Townhouse => "SOBRADO",
            PropertyType::Commercial => "COMERCIAL",
            PropertyType::Office => "SALA_COMERCIAL",
            PropertyType::Store => "LOJA",
            PropertyType::Warehouse => "GALPAO",
            PropertyType::Lot => "TERRENO",
            PropertyType::SmallFarm => "CHACARA",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPropertyType(pub String);

impl FromStr for PropertyType {
    type Err = UnknownPropertyType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownPropertyType(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i32,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "endereco")]
    pub address: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "bairro")]
    pub neighborhood: Option<String>,
    #[serde(rename = "cep")]
    pub postal_code: Option<String>,
    #[serde(rename = "tipo")]
    pub kind: PropertyType,
    #[serde(rename = "aluguelMensal")]
    pub monthly_rent: Decimal,
    #[serde(rename = "disponivel")]
    pub available: bool,
    #[serde(rename = "fotos")]
    pub photos: Option<String>,
    #[serde(rename = "proprietarioId")]
    pub landlord_id: i32,
    pub admin_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[sqlx(skip)]
    #[serde(rename = "proprietario", skip_serializing_if = "Option::is_none")]
    pub landlord: Option<Landlord>,
}

/// Validated listing fields supplied by a client on creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub title: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub neighborhood: Option<String>,
    pub postal_code: Option<String>,
    pub kind: PropertyType,
    pub monthly_rent: Decimal,
    pub available: bool,
    pub photos: Option<String>,
}

/// Partial update. `None` leaves a column untouched; for nullable columns
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<Option<String>>,
    pub postal_code: Option<Option<String>>,
    pub kind: Option<PropertyType>,
    pub monthly_rent: Option<Decimal>,
    pub available: Option<bool>,
    pub photos: Option<Option<String>>,
}

impl PropertyPatch {
    pub fn is_empty(&self) -> bool {
        *self == PropertyPatch::default()
    }

    /// Apply the patch to an in-memory row.
    pub fn apply_to(&self, property: &mut Property) {
        if let Some(v) = &self.title {
            property.title = v.clone();
        }
        if let Some(v) = &self.description {
            property.description = v.clone();
        }
        if let Some(v) = &self.address {
            property.address = v.clone();
        }
        if let Some(v) = &self.city {
            property.city = v.clone();
        }
        if let Some(v) = &self.neighborhood {
            property.neighborhood = v.clone();
        }
        if let Some(v) = &self.postal_code {
            property.postal_code = v.clone();
        }
        if let Some(v) = self.kind {
            property.kind = v;
        }
        if let Some(v) = self.monthly_rent {
            property.monthly_rent = v;
        }
        if let Some(v) = self.available {
            property.available = v;
        }
        if let Some(v) = &self.photos {
            property.photos = v.clone();
        }
    }
}
