use std::sync::Arc;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::ServiceError;
use crate::api::payload::parse_decimal;
use crate::auth::Principal;
use crate::database::models::{NewProperty, Property, PropertyPatch};
use crate::database::Store;

/// Number of listings on the home page highlight strip.
pub const FEATURED_LIMIT: i64 = 6;

/// How a free-form search term is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Rent ceiling, inclusive.
    MaxRent(Decimal),
    /// Case-insensitive substring of title, city or landlord name.
    Text(String),
}

impl SearchQuery {
    /// A term that is entirely a number (plain or scientific notation) is a
    /// rent ceiling; anything else is a text search.
    pub fn parse(term: &str) -> Self {
        let term = term.trim();
        match parse_decimal(term).or_else(|| ceiling_out_of_range(term)) {
            Some(ceiling) => SearchQuery::MaxRent(ceiling),
            None => SearchQuery::Text(term.to_string()),
        }
    }
}

/// Numbers `Decimal` cannot hold: huge ceilings saturate, tiny ones become zero.
fn ceiling_out_of_range(term: &str) -> Option<Decimal> {
    let value = term.parse::<f64>().ok().filter(|v| v.is_finite())?;
    // Below the smallest representable step
    if value.abs() < 1e-28 {
        return Some(Decimal::ZERO);
    }
    if value >= 7.9e28 {
        return Some(Decimal::MAX);
    }
    if value <= -7.9e28 {
        return Some(Decimal::MIN);
    }
    Decimal::from_f64(value)
}

#[derive(Clone)]
pub struct PropertyService {
    store: Arc<dyn Store>,
}

impl PropertyService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list_available(&self) -> Result<Vec<Property>, ServiceError> {
        Ok(self.store.list_available(None).await?)
    }

    pub async fn list_featured(&self) -> Result<Vec<Property>, ServiceError> {
        Ok(self.store.list_available(Some(FEATURED_LIMIT)).await?)
    }

    /// Fetch one listing whether or not it is still available.
    pub async fn get_by_id(&self, id: i32) -> Result<Property, ServiceError> {
        self.store
            .find_property(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Create a listing owned by the acting admin.
    ///
    /// Owner and landlord are always derived from the principal, never from
    /// the payload.
    pub async fn create(&self, property: NewProperty, principal: &Principal) -> Result<Property, ServiceError> {
        let admin = self
            .store
            .find_admin(principal.effective_id())
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Admin não encontrado".to_string()))?;

        let created = self.store.create_property(&admin, property).await?;
        info!(
            "Property {} created by admin {} (landlord {})",
            created.id, admin.id, created.landlord_id
        );
        Ok(created)
    }

    /// Apply a partial update. Any authenticated principal may edit any listing.
    pub async fn update(&self, id: i32, patch: PropertyPatch, principal: &Principal) -> Result<Property, ServiceError> {
        if patch.is_empty() {
            return self.get_by_id(id).await;
        }

        let updated = self
            .store
            .update_property(id, &patch)
            .await?
            .ok_or_else(|| not_found(id))?;

        info!("Property {} updated by {}", id, principal.effective_id());
        Ok(updated)
    }

    /// Mark a listing unavailable and record who did it.
    pub async fn soft_delete(&self, id: i32, principal: &Principal) -> Result<Property, ServiceError> {
        let removed = self
            .store
            .withdraw_property(id, principal.effective_id(), principal.effective_name())
            .await?
            .ok_or_else(|| not_found(id))?;

        info!("Property {} withdrawn by {}", id, principal.effective_name());
        Ok(removed)
    }

    pub async fn search(&self, term: &str) -> Result<Vec<Property>, ServiceError> {
        let query = SearchQuery::parse(term);
        debug!("Property search {:?}", query);

        let results = match &query {
            SearchQuery::MaxRent(ceiling) => self.store.search_by_max_rent(*ceiling).await?,
            SearchQuery::Text(text) => self.store.search_by_text(text).await?,
        };
        Ok(results)
    }
}

fn not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Imóvel {} não encontrado", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_terms_are_rent_ceilings() {
        assert_eq!(SearchQuery::parse("1500"), SearchQuery::MaxRent(Decimal::from(1500)));
        assert_eq!(SearchQuery::parse(" 1500.50 "), SearchQuery::MaxRent("1500.50".parse().unwrap()));
        assert_eq!(SearchQuery::parse("1.5e3"), SearchQuery::MaxRent(Decimal::from(1500)));
        assert_eq!(SearchQuery::parse(".5"), SearchQuery::MaxRent("0.5".parse().unwrap()));
    }

    #[test]
    fn numbers_outside_decimal_range_are_still_ceilings() {
        assert_eq!(SearchQuery::parse("1e30"), SearchQuery::MaxRent(Decimal::MAX));
        assert_eq!(
            SearchQuery::parse("100000000000000000000000000000000"),
            SearchQuery::MaxRent(Decimal::MAX)
        );
        assert_eq!(SearchQuery::parse("1e-30"), SearchQuery::MaxRent(Decimal::ZERO));
        assert_eq!(SearchQuery::parse("-1e40"), SearchQuery::MaxRent(Decimal::MIN));
    }

    #[test]
    fn other_terms_are_text() {
        assert_eq!(SearchQuery::parse("Pelotas"), SearchQuery::Text("Pelotas".to_string()));
        assert_eq!(SearchQuery::parse("1500 reais"), SearchQuery::Text("1500 reais".to_string()));
        assert_eq!(SearchQuery::parse("Infinity"), SearchQuery::Text("Infinity".to_string()));
        assert_eq!(SearchQuery::parse("  "), SearchQuery::Text(String::new()));
    }
}
