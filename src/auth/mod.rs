pub mod password;
pub mod principal;
pub mod token;

pub use password::{PasswordViolation, MIN_PASSWORD_LENGTH};
pub use principal::{Identity, Principal, PrincipalKind, CUSTOMER_LEVEL};
pub use token::{Claims, TokenError, TokenService, TOKEN_TTL_HOURS};
