pub mod auth;
pub mod response;

pub use auth::{require_auth, AuthRejection};
pub use response::{ApiResponse, ApiResult};
