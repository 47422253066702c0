//! Persistence contracts consumed by the services.
//!
//! [`PgStore`](super::postgres::PgStore) is the production implementation;
//! [`MemoryStore`](super::memory::MemoryStore) backs the test-suite and
//! `serve --in-memory`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    AdminAccount, AuditLogEntry, CustomerAccount, Landlord, NewAdmin, NewAuditEntry, NewCustomer,
    NewLandlord, NewProperty, NewProposal, Property, PropertyPatch, Proposal,
};

/// Admin and customer accounts.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>, DatabaseError>;

    async fn find_admin(&self, id: Uuid) -> Result<Option<AdminAccount>, DatabaseError>;

    async fn list_admins(&self) -> Result<Vec<AdminAccount>, DatabaseError>;

    /// Fails with [`DatabaseError::Conflict`] when the e-mail is taken.
    async fn create_admin(&self, admin: NewAdmin) -> Result<AdminAccount, DatabaseError>;

    async fn find_customer(&self, id: Uuid) -> Result<Option<CustomerAccount>, DatabaseError>;

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<CustomerAccount>, DatabaseError>;

    async fn create_customer(&self, customer: NewCustomer) -> Result<CustomerAccount, DatabaseError>;
}

/// Listings and their landlords. Every returned [`Property`] has its landlord attached.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Available listings, newest first, optionally capped at `limit`.
    async fn list_available(&self, limit: Option<i64>) -> Result<Vec<Property>, DatabaseError>;

    /// Fetch by id regardless of availability.
    async fn find_property(&self, id: i32) -> Result<Option<Property>, DatabaseError>;

    /// Insert a listing owned by `admin`.
    ///
    /// The landlord with the admin's e-mail is looked up or created in the same
    /// transaction as the insert, so concurrent first listings by one admin
    /// still yield a single landlord row.
    async fn create_property(&self, admin: &AdminAccount, property: NewProperty) -> Result<Property, DatabaseError>;

    async fn update_property(&self, id: i32, patch: &PropertyPatch) -> Result<Option<Property>, DatabaseError>;

    /// Mark a listing unavailable and append its removal to the audit trail.
    ///
    /// Both writes land together or not at all. `None` when the id is unknown.
    async fn withdraw_property(
        &self,
        id: i32,
        actor_id: Uuid,
        actor_name: &str,
    ) -> Result<Option<Property>, DatabaseError>;

    /// Available listings with `monthly_rent <= ceiling`, newest first.
    async fn search_by_max_rent(&self, ceiling: Decimal) -> Result<Vec<Property>, DatabaseError>;

    /// Available listings whose title, city or landlord name contains `term`
    /// ignoring case, newest first.
    async fn search_by_text(&self, term: &str) -> Result<Vec<Property>, DatabaseError>;

    /// Return the landlord with `landlord.email`, inserting it when absent.
    async fn ensure_landlord(&self, landlord: NewLandlord) -> Result<Landlord, DatabaseError>;
}

/// Customer proposals on listings.
#[async_trait]
pub trait ProposalStore: Send + Sync {
    /// Every proposal, newest first, with its customer and listing attached.
    async fn list_proposals(&self) -> Result<Vec<Proposal>, DatabaseError>;

    /// One customer's proposals, newest first, with the listing attached.
    async fn list_proposals_by_customer(&self, customer_id: Uuid) -> Result<Vec<Proposal>, DatabaseError>;

    async fn create_proposal(&self, proposal: NewProposal) -> Result<Proposal, DatabaseError>;

    /// Store the landlord's answer. `None` when the id is unknown.
    async fn reply_to_proposal(&self, id: i32, reply: &str) -> Result<Option<Proposal>, DatabaseError>;
}

/// Append-only audit trail.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditLogEntry, DatabaseError>;
}

#[async_trait]
pub trait Store: CredentialStore + PropertyStore + ProposalStore + AuditSink {
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
