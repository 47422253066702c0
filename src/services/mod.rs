pub mod admin_service;
pub mod property_service;
pub mod proposal_service;
pub mod session_service;

use thiserror::Error;

use crate::auth::{password, PasswordViolation, TokenError};
use crate::database::DatabaseError;

pub use admin_service::AdminService;
pub use property_service::{PropertyService, SearchQuery, FEATURED_LIMIT};
pub use proposal_service::ProposalService;
pub use session_service::{AdminSession, CustomerSession, SessionService};

/// Domain failures shared by the services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Login ou senha incorretos")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{}", password::describe(.0))]
    PasswordPolicy(Vec<PasswordViolation>),

    #[error("Persistence error: {0}")]
    Persistence(#[from] DatabaseError),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

/// Run bcrypt work off the async runtime.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServiceError::Hashing(e.to_string()))
}
