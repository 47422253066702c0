use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use uuid::Uuid;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{
    AdminAccount, AuditLogEntry, CustomerAccount, Landlord, NewAdmin, NewAuditEntry, NewCustomer,
    NewLandlord, NewProperty, NewProposal, Property, PropertyPatch, Proposal,
};
use super::store::{AuditSink, CredentialStore, PropertyStore, ProposalStore, Store};

macro_rules! property_columns {
    () => {
        "id, title, description, address, city, neighborhood, postal_code, kind, monthly_rent, \
         available, photos, landlord_id, admin_id, created_at, updated_at"
    };
}

macro_rules! select_properties {
    () => {
        "SELECT p.id, p.title, p.description, p.address, p.city, p.neighborhood, p.postal_code, \
         p.kind, p.monthly_rent, p.available, p.photos, p.landlord_id, p.admin_id, p.created_at, \
         p.updated_at FROM properties p"
    };
}

macro_rules! landlord_columns {
    () => {
        "id, name, email, password_hash, phone, city, created_at"
    };
}

macro_rules! insert_audit {
    () => {
        "INSERT INTO audit_logs (description, detail, admin_id) VALUES ($1, $2, $3)"
    };
}

const INSERT_AUDIT: &str = insert_audit!();

macro_rules! proposal_columns {
    () => {
        "id, customer_id, property_id, description, reply, created_at, updated_at"
    };
}

const ADMIN_COLUMNS: &str = "id, name, email, password_hash, level, created_at, updated_at";
const CUSTOMER_COLUMNS: &str = "id, name, email, password_hash, created_at";

// A no-op DO UPDATE lets RETURNING yield the existing row on conflict.
const UPSERT_LANDLORD: &str = concat!(
    "INSERT INTO landlords (name, email, password_hash, phone, city) VALUES ($1, $2, $3, $4, $5) \
     ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email RETURNING ",
    landlord_columns!()
);

/// sqlx-backed implementation of the store traits.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn with_landlords(&self, mut properties: Vec<Property>) -> Result<Vec<Property>, DatabaseError> {
        if properties.is_empty() {
            return Ok(properties);
        }

        let mut ids: Vec<i32> = properties.iter().map(|p| p.landlord_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let landlords: Vec<Landlord> =
            sqlx::query_as(concat!("SELECT ", landlord_columns!(), " FROM landlords WHERE id = ANY($1)"))
                .bind(&ids)
                .fetch_all(&self.pool)
                .await?;

        let by_id: HashMap<i32, Landlord> = landlords.into_iter().map(|l| (l.id, l)).collect();
        for property in &mut properties {
            property.landlord = by_id.get(&property.landlord_id).cloned();
        }

        Ok(properties)
    }

    /// Attach listings (with landlords) and, when asked, customers to proposals.
    async fn with_proposal_relations(
        &self,
        mut proposals: Vec<Proposal>,
        with_customer: bool,
    ) -> Result<Vec<Proposal>, DatabaseError> {
        if proposals.is_empty() {
            return Ok(proposals);
        }

        let property_ids: Vec<i32> = proposals.iter().map(|p| p.property_id).collect();
        let properties: Vec<Property> = sqlx::query_as(concat!(select_properties!(), " WHERE p.id = ANY($1)"))
            .bind(&property_ids)
            .fetch_all(&self.pool)
            .await?;
        let properties: HashMap<i32, Property> = self
            .with_landlords(properties)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let customers: HashMap<Uuid, CustomerAccount> = if with_customer {
            let customer_ids: Vec<Uuid> = proposals.iter().map(|p| p.customer_id).collect();
            let sql = format!("SELECT {} FROM customers WHERE id = ANY($1)", CUSTOMER_COLUMNS);
            let rows: Vec<CustomerAccount> = sqlx::query_as(&sql).bind(&customer_ids).fetch_all(&self.pool).await?;
            rows.into_iter().map(|c| (c.id, c)).collect()
        } else {
            HashMap::new()
        };

        for proposal in &mut proposals {
            proposal.property = properties.get(&proposal.property_id).cloned();
            proposal.customer = customers.get(&proposal.customer_id).cloned();
        }

        Ok(proposals)
    }

    async fn with_landlord(&self, property: Option<Property>) -> Result<Option<Property>, DatabaseError> {
        match property {
            Some(p) => Ok(self.with_landlords(vec![p]).await?.pop()),
            None => Ok(None),
        }
    }
}

/// Escape LIKE wildcards so the term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>, DatabaseError> {
        let sql = format!("SELECT {} FROM admins WHERE email = $1", ADMIN_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(email).fetch_optional(&self.pool).await?)
    }

    async fn find_admin(&self, id: Uuid) -> Result<Option<AdminAccount>, DatabaseError> {
        let sql = format!("SELECT {} FROM admins WHERE id = $1", ADMIN_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn list_admins(&self) -> Result<Vec<AdminAccount>, DatabaseError> {
        let sql = format!("SELECT {} FROM admins ORDER BY created_at", ADMIN_COLUMNS);
        Ok(sqlx::query_as(&sql).fetch_all(&self.pool).await?)
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<AdminAccount, DatabaseError> {
        let sql = format!(
            "INSERT INTO admins (id, name, email, password_hash, level) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            ADMIN_COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(&admin.name)
            .bind(&admin.email)
            .bind(&admin.password_hash)
            .bind(admin.level)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_write)
    }

    async fn find_customer(&self, id: Uuid) -> Result<Option<CustomerAccount>, DatabaseError> {
        let sql = format!("SELECT {} FROM customers WHERE id = $1", CUSTOMER_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<CustomerAccount>, DatabaseError> {
        let sql = format!("SELECT {} FROM customers WHERE email = $1", CUSTOMER_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(email).fetch_optional(&self.pool).await?)
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<CustomerAccount, DatabaseError> {
        let sql = format!(
            "INSERT INTO customers (id, name, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING {}",
            CUSTOMER_COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(&customer.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_write)
    }
}

#[async_trait]
impl PropertyStore for PgStore {
    async fn list_available(&self, limit: Option<i64>) -> Result<Vec<Property>, DatabaseError> {
        let rows: Vec<Property> =
            sqlx::query_as(concat!(select_properties!(), " WHERE p.available ORDER BY p.id DESC LIMIT $1"))
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;
        self.with_landlords(rows).await
    }

    async fn find_property(&self, id: i32) -> Result<Option<Property>, DatabaseError> {
        let row: Option<Property> = sqlx::query_as(concat!(select_properties!(), " WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        self.with_landlord(row).await
    }

    async fn create_property(&self, admin: &AdminAccount, property: NewProperty) -> Result<Property, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let landlord: Landlord = sqlx::query_as(UPSERT_LANDLORD)
            .bind(&admin.name)
            .bind(&admin.email)
            .bind(&admin.password_hash)
            .bind(None::<String>)
            .bind(None::<String>)
            .fetch_one(&mut *tx)
            .await
            .map_err(DatabaseError::from_write)?;

        let mut created: Property = sqlx::query_as(concat!(
            "INSERT INTO properties (title, description, address, city, neighborhood, postal_code, kind, \
             monthly_rent, available, photos, landlord_id, admin_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING ",
            property_columns!()
        ))
        .bind(&property.title)
        .bind(&property.description)
        .bind(&property.address)
        .bind(&property.city)
        .bind(&property.neighborhood)
        .bind(&property.postal_code)
        .bind(property.kind)
        .bind(property.monthly_rent)
        .bind(property.available)
        .bind(&property.photos)
        .bind(landlord.id)
        .bind(admin.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::from_write)?;

        tx.commit().await?;

        created.landlord = Some(landlord);
        Ok(created)
    }

    async fn update_property(&self, id: i32, patch: &PropertyPatch) -> Result<Option<Property>, DatabaseError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE properties SET updated_at = now()");

        if let Some(v) = &patch.title {
            qb.push(", title = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.description {
            qb.push(", description = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.address {
            qb.push(", address = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.city {
            qb.push(", city = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.neighborhood {
            qb.push(", neighborhood = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.postal_code {
            qb.push(", postal_code = ").push_bind(v.clone());
        }
        if let Some(v) = patch.kind {
            qb.push(", kind = ").push_bind(v);
        }
        if let Some(v) = patch.monthly_rent {
            qb.push(", monthly_rent = ").push_bind(v);
        }
        if let Some(v) = patch.available {
            qb.push(", available = ").push_bind(v);
        }
        if let Some(v) = &patch.photos {
            qb.push(", photos = ").push_bind(v.clone());
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(concat!(" RETURNING ", property_columns!()));

        let row: Option<Property> = qb
            .build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_write)?;
        self.with_landlord(row).await
    }

    async fn withdraw_property(
        &self,
        id: i32,
        actor_id: Uuid,
        actor_name: &str,
    ) -> Result<Option<Property>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<Property> = sqlx::query_as(concat!(
            "UPDATE properties SET available = FALSE, updated_at = now() WHERE id = $1 RETURNING ",
            property_columns!()
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let entry = NewAuditEntry::property_removed(&row.title, actor_id, actor_name);
        sqlx::query(INSERT_AUDIT)
            .bind(&entry.description)
            .bind(&entry.detail)
            .bind(entry.admin_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        self.with_landlord(Some(row)).await
    }

    async fn search_by_max_rent(&self, ceiling: Decimal) -> Result<Vec<Property>, DatabaseError> {
        let rows: Vec<Property> = sqlx::query_as(concat!(
            select_properties!(),
            " WHERE p.available AND p.monthly_rent <= $1 ORDER BY p.id DESC"
        ))
        .bind(ceiling)
        .fetch_all(&self.pool)
        .await?;
        self.with_landlords(rows).await
    }

    async fn search_by_text(&self, term: &str) -> Result<Vec<Property>, DatabaseError> {
        let rows: Vec<Property> = sqlx::query_as(concat!(
            select_properties!(),
            " JOIN landlords l ON l.id = p.landlord_id \
             WHERE p.available \
               AND (p.title ILIKE $1 ESCAPE '\\' OR p.city ILIKE $1 ESCAPE '\\' OR l.name ILIKE $1 ESCAPE '\\') \
             ORDER BY p.id DESC"
        ))
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;
        self.with_landlords(rows).await
    }

    async fn ensure_landlord(&self, landlord: NewLandlord) -> Result<Landlord, DatabaseError> {
        sqlx::query_as(UPSERT_LANDLORD)
            .bind(&landlord.name)
            .bind(&landlord.email)
            .bind(&landlord.password_hash)
            .bind(&landlord.phone)
            .bind(&landlord.city)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_write)
    }
}

#[async_trait]
impl ProposalStore for PgStore {
    async fn list_proposals(&self) -> Result<Vec<Proposal>, DatabaseError> {
        let rows: Vec<Proposal> =
            sqlx::query_as(concat!("SELECT ", proposal_columns!(), " FROM proposals ORDER BY id DESC"))
                .fetch_all(&self.pool)
                .await?;
        self.with_proposal_relations(rows, true).await
    }

    async fn list_proposals_by_customer(&self, customer_id: Uuid) -> Result<Vec<Proposal>, DatabaseError> {
        let rows: Vec<Proposal> = sqlx::query_as(concat!(
            "SELECT ",
            proposal_columns!(),
            " FROM proposals WHERE customer_id = $1 ORDER BY id DESC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        self.with_proposal_relations(rows, false).await
    }

    async fn create_proposal(&self, proposal: NewProposal) -> Result<Proposal, DatabaseError> {
        sqlx::query_as(concat!(
            "INSERT INTO proposals (customer_id, property_id, description) VALUES ($1, $2, $3) RETURNING ",
            proposal_columns!()
        ))
        .bind(proposal.customer_id)
        .bind(proposal.property_id)
        .bind(&proposal.description)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_write)
    }

    async fn reply_to_proposal(&self, id: i32, reply: &str) -> Result<Option<Proposal>, DatabaseError> {
        Ok(sqlx::query_as(concat!(
            "UPDATE proposals SET reply = $1, updated_at = now() WHERE id = $2 RETURNING ",
            proposal_columns!()
        ))
        .bind(reply)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }
}

#[async_trait]
impl AuditSink for PgStore {
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditLogEntry, DatabaseError> {
        Ok(
            sqlx::query_as(concat!(insert_audit!(), " RETURNING id, description, detail, admin_id, created_at"))
                .bind(&entry.description)
                .bind(&entry.detail)
                .bind(entry.admin_id)
                .fetch_one(&self.pool)
                .await?,
        )
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
