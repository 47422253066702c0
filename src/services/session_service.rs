use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{blocking, ServiceError};
use crate::api::Credentials;
use crate::auth::password::verify_password;
use crate::auth::{Principal, TokenService};
use crate::database::models::NewAuditEntry;
use crate::database::Store;

/// Successful admin login as returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSession {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "nivel")]
    pub level: i32,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerSession {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Exchanges credentials for signed tokens.
///
/// Every failure (unknown e-mail, wrong password) surfaces as the same
/// [`ServiceError::InvalidCredentials`].
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn Store>,
    tokens: Arc<TokenService>,
}

impl SessionService {
    pub fn new(store: Arc<dyn Store>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    pub async fn admin_login(&self, credentials: Credentials) -> Result<AdminSession, ServiceError> {
        let Some(admin) = self.store.find_admin_by_email(&credentials.email).await? else {
            warn!("Admin login for unknown e-mail");
            return Err(ServiceError::InvalidCredentials);
        };

        let hash = admin.password_hash.clone();
        let matches = blocking(move || verify_password(&credentials.password, &hash)).await?;

        if !matches {
            warn!("Wrong password for admin {}", admin.id);
            // The login still fails the same way if the audit write does not land
            if let Err(e) = self
                .store
                .record(NewAuditEntry::failed_login(admin.id, &admin.name))
                .await
            {
                error!("Failed to record login attempt for admin {}: {}", admin.id, e);
            }
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(&Principal::admin(admin.id, admin.name.clone(), admin.level))?;

        info!("Admin {} logged in", admin.id);
        Ok(AdminSession {
            id: admin.id,
            name: admin.name,
            email: admin.email,
            level: admin.level,
            token,
        })
    }

    pub async fn customer_login(&self, credentials: Credentials) -> Result<CustomerSession, ServiceError> {
        let Some(customer) = self.store.find_customer_by_email(&credentials.email).await? else {
            warn!("Customer login for unknown e-mail");
            return Err(ServiceError::InvalidCredentials);
        };

        let hash = customer.password_hash.clone();
        let matches = blocking(move || verify_password(&credentials.password, &hash)).await?;
        if !matches {
            warn!("Wrong password for customer {}", customer.id);
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(&Principal::customer(customer.id, customer.name.clone()))?;

        info!("Customer {} logged in", customer.id);
        Ok(CustomerSession {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            token,
        })
    }
}
