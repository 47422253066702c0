use serde::Serialize;
use uuid::Uuid;

/// Role level carried by customer tokens; customers have no admin level.
pub const CUSTOMER_LEVEL: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Customer,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub level: i32,
}

/// Authenticated identity resolved from a bearer token.
///
/// Handlers that only need "who is acting" should use [`Principal::effective_id`]
/// and [`Principal::effective_name`], which behave the same for both kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Customer(Identity),
    Admin(Identity),
}

impl Principal {
    pub fn admin(id: Uuid, name: impl Into<String>, level: i32) -> Self {
        Principal::Admin(Identity { id, name: name.into(), level })
    }

    pub fn customer(id: Uuid, name: impl Into<String>) -> Self {
        Principal::Customer(Identity { id, name: name.into(), level: CUSTOMER_LEVEL })
    }

    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::Customer(_) => PrincipalKind::Customer,
            Principal::Admin(_) => PrincipalKind::Admin,
        }
    }

    pub fn identity(&self) -> &Identity {
        match self {
            Principal::Customer(identity) | Principal::Admin(identity) => identity,
        }
    }

    pub fn effective_id(&self) -> Uuid {
        self.identity().id
    }

    pub fn effective_name(&self) -> &str {
        &self.identity().name
    }

    pub fn level(&self) -> i32 {
        self.identity().level
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_are_uniform_across_kinds() {
        let id = Uuid::new_v4();
        let admin = Principal::admin(id, "Maria Admin", 3);
        let customer = Principal::customer(id, "João Cliente");

        assert_eq!(admin.effective_id(), customer.effective_id());
        assert_eq!(admin.effective_name(), "Maria Admin");
        assert_eq!(customer.effective_name(), "João Cliente");
        assert_eq!(admin.kind(), PrincipalKind::Admin);
        assert_eq!(customer.kind(), PrincipalKind::Customer);
        assert_eq!(customer.level(), CUSTOMER_LEVEL);
        assert!(admin.is_admin());
        assert!(!customer.is_admin());
    }
}
