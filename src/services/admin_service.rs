use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{blocking, ServiceError};
use crate::api::AdminInput;
use crate::auth::password;
use crate::database::models::{AdminAccount, NewAdmin};
use crate::database::{DatabaseError, Store};

#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn Store>,
    bcrypt_cost: u32,
}

impl AdminService {
    pub fn new(store: Arc<dyn Store>, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    /// Provision an admin account.
    ///
    /// The password must satisfy every complexity rule; all violations are
    /// reported together.
    pub async fn create(&self, input: AdminInput) -> Result<AdminAccount, ServiceError> {
        let violations = password::validate(&input.password);
        if !violations.is_empty() {
            return Err(ServiceError::PasswordPolicy(violations));
        }

        let cost = self.bcrypt_cost;
        let plain = input.password;
        let password_hash = blocking(move || password::hash_password(&plain, cost))
            .await?
            .map_err(|e| ServiceError::Hashing(e.to_string()))?;

        let admin = self
            .store
            .create_admin(NewAdmin {
                name: input.name,
                email: input.email,
                password_hash,
                level: input.level,
            })
            .await
            .map_err(|e| match e {
                DatabaseError::Conflict(_) => ServiceError::Conflict("E-mail já cadastrado".to_string()),
                other => ServiceError::Persistence(other),
            })?;

        info!("Admin {} created with level {}", admin.id, admin.level);
        Ok(admin)
    }

    pub async fn list(&self) -> Result<Vec<AdminAccount>, ServiceError> {
        Ok(self.store.list_admins().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<AdminAccount, ServiceError> {
        self.store
            .find_admin(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Admin não encontrado".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PasswordViolation;
    use crate::database::MemoryStore;

    fn service() -> AdminService {
        AdminService::new(Arc::new(MemoryStore::new()), 4)
    }

    fn input(email: &str, password: &str) -> AdminInput {
        AdminInput {
            name: "Administrador Teste".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            level: 2,
        }
    }

    #[tokio::test]
    async fn creates_admin_with_hashed_password() {
        let svc = service();
        let admin = svc.create(input("a@b.com", "Segura#2024")).await.unwrap();

        assert_ne!(admin.password_hash, "Segura#2024");
        assert!(password::verify_password("Segura#2024", &admin.password_hash));
        assert_eq!(svc.get(admin.id).await.unwrap().email, "a@b.com");
    }

    #[tokio::test]
    async fn weak_password_reports_every_rule() {
        let err = service().create(input("a@b.com", "abc")).await.unwrap_err();
        match err {
            ServiceError::PasswordPolicy(v) => assert_eq!(
                v,
                vec![
                    PasswordViolation::TooShort,
                    PasswordViolation::MissingUppercase,
                    PasswordViolation::MissingDigit,
                    PasswordViolation::MissingSymbol,
                ]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let svc = service();
        svc.create(input("a@b.com", "Segura#2024")).await.unwrap();
        let err = svc.create(input("a@b.com", "Segura#2025")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn unknown_admin_is_not_found() {
        let err = service().get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
