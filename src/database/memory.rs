use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    AdminAccount, AuditLogEntry, CustomerAccount, Landlord, NewAdmin, NewAuditEntry, NewCustomer,
    NewLandlord, NewProperty, NewProposal, Property, PropertyPatch, Proposal,
};
use super::store::{AuditSink, CredentialStore, PropertyStore, ProposalStore, Store};

#[derive(Default)]
struct Inner {
    admins: Vec<AdminAccount>,
    customers: Vec<CustomerAccount>,
    landlords: Vec<Landlord>,
    properties: BTreeMap<i32, Property>,
    proposals: BTreeMap<i32, Proposal>,
    audit: Vec<AuditLogEntry>,
    next_landlord_id: i32,
    next_property_id: i32,
    next_proposal_id: i32,
    next_audit_id: i32,
    audit_offline: bool,
}

impl Inner {
    fn landlord(&self, id: i32) -> Option<Landlord> {
        self.landlords.iter().find(|l| l.id == id).cloned()
    }

    fn hydrate(&self, property: &Property) -> Property {
        let mut property = property.clone();
        property.landlord = self.landlord(property.landlord_id);
        property
    }

    fn hydrate_proposal(&self, proposal: &Proposal, with_customer: bool) -> Proposal {
        let mut proposal = proposal.clone();
        proposal.property = self.properties.get(&proposal.property_id).map(|p| self.hydrate(p));
        if with_customer {
            proposal.customer = self.customers.iter().find(|c| c.id == proposal.customer_id).cloned();
        }
        proposal
    }

    /// Available rows newest first, filtered by `keep`.
    fn available<F>(&self, keep: F) -> Vec<Property>
    where
        F: Fn(&Property, Option<&Landlord>) -> bool,
    {
        self.properties
            .values()
            .rev()
            .filter(|p| p.available)
            .map(|p| self.hydrate(p))
            .filter(|p| keep(p, p.landlord.as_ref()))
            .collect()
    }

    fn push_audit(&mut self, entry: NewAuditEntry) -> Result<AuditLogEntry, DatabaseError> {
        if self.audit_offline {
            return Err(DatabaseError::QueryError("audit_logs is not accepting writes".to_string()));
        }

        self.next_audit_id += 1;
        let created = AuditLogEntry {
            id: self.next_audit_id,
            description: entry.description,
            detail: entry.detail,
            admin_id: entry.admin_id,
            created_at: Utc::now(),
        };
        self.audit.push(created.clone());
        Ok(created)
    }

    fn ensure_landlord(&mut self, landlord: NewLandlord) -> Landlord {
        if let Some(existing) = self.landlords.iter().find(|l| l.email == landlord.email) {
            return existing.clone();
        }

        self.next_landlord_id += 1;
        let created = Landlord {
            id: self.next_landlord_id,
            name: landlord.name,
            email: landlord.email,
            password_hash: landlord.password_hash,
            phone: landlord.phone,
            city: landlord.city,
            created_at: Utc::now(),
        };
        self.landlords.push(created.clone());
        created
    }
}

/// Process-local store guarded by a single lock.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the audit trail, oldest first.
    pub async fn audit_entries(&self) -> Vec<AuditLogEntry> {
        self.inner.read().await.audit.clone()
    }

    pub async fn landlords(&self) -> Vec<Landlord> {
        self.inner.read().await.landlords.clone()
    }

    /// Make every audit write fail until switched back.
    pub async fn set_audit_offline(&self, offline: bool) {
        self.inner.write().await.audit_offline = offline;
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.admins.iter().find(|a| a.email == email).cloned())
    }

    async fn find_admin(&self, id: Uuid) -> Result<Option<AdminAccount>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.admins.iter().find(|a| a.id == id).cloned())
    }

    async fn list_admins(&self) -> Result<Vec<AdminAccount>, DatabaseError> {
        Ok(self.inner.read().await.admins.clone())
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<AdminAccount, DatabaseError> {
        let mut inner = self.inner.write().await;
        if inner.admins.iter().any(|a| a.email == admin.email) {
            return Err(DatabaseError::Conflict("admins_email_key".to_string()));
        }

        let now = Utc::now();
        let created = AdminAccount {
            id: Uuid::new_v4(),
            name: admin.name,
            email: admin.email,
            password_hash: admin.password_hash,
            level: admin.level,
            created_at: now,
            updated_at: now,
        };
        inner.admins.push(created.clone());
        Ok(created)
    }

    async fn find_customer(&self, id: Uuid) -> Result<Option<CustomerAccount>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<CustomerAccount>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.customers.iter().find(|c| c.email == email).cloned())
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<CustomerAccount, DatabaseError> {
        let mut inner = self.inner.write().await;
        if inner.customers.iter().any(|c| c.email == customer.email) {
            return Err(DatabaseError::Conflict("customers_email_key".to_string()));
        }

        let created = CustomerAccount {
            id: Uuid::new_v4(),
            name: customer.name,
            email: customer.email,
            password_hash: customer.password_hash,
            created_at: Utc::now(),
        };
        inner.customers.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl PropertyStore for MemoryStore {
    async fn list_available(&self, limit: Option<i64>) -> Result<Vec<Property>, DatabaseError> {
        let inner = self.inner.read().await;
        let mut rows = inner.available(|_, _| true);
        if let Some(limit) = limit {
            rows.truncate(usize::try_from(limit).unwrap_or(0));
        }
        Ok(rows)
    }

    async fn find_property(&self, id: i32) -> Result<Option<Property>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.properties.get(&id).map(|p| inner.hydrate(p)))
    }

    async fn create_property(&self, admin: &AdminAccount, property: NewProperty) -> Result<Property, DatabaseError> {
        let mut inner = self.inner.write().await;

        let landlord = inner.ensure_landlord(NewLandlord {
            name: admin.name.clone(),
            email: admin.email.clone(),
            password_hash: admin.password_hash.clone(),
            phone: None,
            city: None,
        });

        inner.next_property_id += 1;
        let now = Utc::now();
        let created = Property {
            id: inner.next_property_id,
            title: property.title,
            description: property.description,
            address: property.address,
            city: property.city,
            neighborhood: property.neighborhood,
            postal_code: property.postal_code,
            kind: property.kind,
            monthly_rent: property.monthly_rent,
            available: property.available,
            photos: property.photos,
            landlord_id: landlord.id,
            admin_id: admin.id,
            created_at: now,
            updated_at: now,
            landlord: None,
        };
        inner.properties.insert(created.id, created.clone());

        Ok(Property { landlord: Some(landlord), ..created })
    }

    async fn update_property(&self, id: i32, patch: &PropertyPatch) -> Result<Option<Property>, DatabaseError> {
        let mut inner = self.inner.write().await;
        let Some(row) = inner.properties.get_mut(&id) else {
            return Ok(None);
        };

        patch.apply_to(row);
        row.updated_at = Utc::now();
        let row = row.clone();
        Ok(Some(inner.hydrate(&row)))
    }

    async fn withdraw_property(
        &self,
        id: i32,
        actor_id: Uuid,
        actor_name: &str,
    ) -> Result<Option<Property>, DatabaseError> {
        let mut inner = self.inner.write().await;
        let Some(title) = inner.properties.get(&id).map(|p| p.title.clone()) else {
            return Ok(None);
        };

        inner.push_audit(NewAuditEntry::property_removed(&title, actor_id, actor_name))?;

        let Some(row) = inner.properties.get_mut(&id) else {
            return Ok(None);
        };
        row.available = false;
        row.updated_at = Utc::now();
        let row = row.clone();
        Ok(Some(inner.hydrate(&row)))
    }

    async fn search_by_max_rent(&self, ceiling: Decimal) -> Result<Vec<Property>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.available(|p, _| p.monthly_rent <= ceiling))
    }

    async fn search_by_text(&self, term: &str) -> Result<Vec<Property>, DatabaseError> {
        let needle = term.to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner.available(|p, landlord| {
            p.title.to_lowercase().contains(&needle)
                || p.city.to_lowercase().contains(&needle)
                || landlord.is_some_and(|l| l.name.to_lowercase().contains(&needle))
        }))
    }

    async fn ensure_landlord(&self, landlord: NewLandlord) -> Result<Landlord, DatabaseError> {
        Ok(self.inner.write().await.ensure_landlord(landlord))
    }
}

#[async_trait]
impl ProposalStore for MemoryStore {
    async fn list_proposals(&self) -> Result<Vec<Proposal>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.proposals.values().rev().map(|p| inner.hydrate_proposal(p, true)).collect())
    }

    async fn list_proposals_by_customer(&self, customer_id: Uuid) -> Result<Vec<Proposal>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner
            .proposals
            .values()
            .rev()
            .filter(|p| p.customer_id == customer_id)
            .map(|p| inner.hydrate_proposal(p, false))
            .collect())
    }

    async fn create_proposal(&self, proposal: NewProposal) -> Result<Proposal, DatabaseError> {
        let mut inner = self.inner.write().await;
        if !inner.customers.iter().any(|c| c.id == proposal.customer_id)
            || !inner.properties.contains_key(&proposal.property_id)
        {
            return Err(DatabaseError::QueryError("proposal references a missing row".to_string()));
        }

        inner.next_proposal_id += 1;
        let now = Utc::now();
        let created = Proposal {
            id: inner.next_proposal_id,
            customer_id: proposal.customer_id,
            property_id: proposal.property_id,
            description: proposal.description,
            reply: None,
            created_at: now,
            updated_at: now,
            customer: None,
            property: None,
        };
        inner.proposals.insert(created.id, created.clone());
        Ok(created)
    }

    async fn reply_to_proposal(&self, id: i32, reply: &str) -> Result<Option<Proposal>, DatabaseError> {
        let mut inner = self.inner.write().await;
        let Some(row) = inner.proposals.get_mut(&id) else {
            return Ok(None);
        };

        row.reply = Some(reply.to_string());
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }
}

#[async_trait]
impl AuditSink for MemoryStore {
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditLogEntry, DatabaseError> {
        self.inner.write().await.push_audit(entry)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
